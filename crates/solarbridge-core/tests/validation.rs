use solarbridge_core::validation::{
    FieldFeedback, PHONE_LEN, PINCODE_LEN, digits_only, validate_email, validate_phone,
    validate_pincode,
};

#[test]
fn phone_requires_exactly_ten_digits() {
    assert!(!validate_phone("98765"));
    assert!(validate_phone("9876543210"));
    assert!(!validate_phone("98765432101"));
    assert!(!validate_phone("98765-43210"));
    assert!(!validate_phone(""));
}

#[test]
fn pincode_requires_exactly_six_digits() {
    assert!(!validate_pincode("56001"));
    assert!(validate_pincode("560001"));
    assert!(!validate_pincode("5600011"));
    assert!(!validate_pincode("56000a"));
}

#[test]
fn email_shape() {
    assert!(validate_email("asha@example.com"));
    assert!(!validate_email("asha@example"));
    assert!(!validate_email("asha example@x.com"));
    assert!(!validate_email("@example.com"));
}

#[test]
fn digits_only_strips_and_truncates() {
    assert_eq!(digits_only("+91 98765-43210", PHONE_LEN), "9198765432");
    assert_eq!(digits_only("560 001", PINCODE_LEN), "560001");
    assert_eq!(digits_only("abc", PINCODE_LEN), "");
}

#[test]
fn feedback_colours() {
    assert_eq!(FieldFeedback::from_check(true).border_color(), "#10b981");
    assert_eq!(FieldFeedback::from_check(false).border_color(), "#ef4444");
}
