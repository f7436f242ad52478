//! Quote form serialization.
//!
//! The browser collects every input as a string. [`AssessmentForm`] holds
//! those raw values and turns them into the JSON payload the submission
//! endpoint expects.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::assessment::NewAssessment;

static FLOAT_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:Infinity|(?:[0-9]+\.?[0-9]*|\.[0-9]+)(?:[eE][+-]?[0-9]+)?)").unwrap()
});

/// Lenient number parsing: leading whitespace is skipped and the longest
/// numeric prefix wins, so `"2500 rs"` reads as `2500`. Anything without a
/// numeric prefix, or a non-finite result, yields `None`.
pub fn parse_float(raw: &str) -> Option<f64> {
    let trimmed = raw.trim_start();
    let prefix = FLOAT_PREFIX.find(trimmed)?.as_str();
    prefix.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Raw string values as read from the quote form. `None` means the input
/// was not present in the form at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssessmentForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub contact: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub pincode: Option<String>,
    pub monthly_bill: Option<String>,
    pub terrace_area: Option<String>,
    pub grid_knowledge: Option<String>,
    pub grid_available: Option<String>,
    pub monthly_consumption: Option<String>,
    pub peak_consumption: Option<String>,
    pub lowest_consumption: Option<String>,
}

/// The grid-availability question only applies to visitors who said they
/// know their grid connection.
pub fn grid_availability_required(grid_knowledge: Option<&str>) -> bool {
    grid_knowledge == Some("yes")
}

/// Consumption inputs are optional and count as zero when left blank.
fn consumption(raw: Option<&str>) -> Option<f64> {
    match raw {
        None | Some("") => Some(0.0),
        Some(v) => parse_float(v),
    }
}

impl AssessmentForm {
    /// Clear the grid-availability answer when the question is hidden.
    pub fn apply_grid_rule(&mut self) {
        if !grid_availability_required(self.grid_knowledge.as_deref()) {
            self.grid_available = None;
        }
    }

    /// True when the grid-availability question is shown but unanswered.
    pub fn missing_grid_availability(&self) -> bool {
        grid_availability_required(self.grid_knowledge.as_deref())
            && self.grid_available.as_deref().is_none_or(str::is_empty)
    }

    pub fn to_submission(&self) -> NewAssessment {
        NewAssessment {
            name: self.name.clone().unwrap_or_default(),
            email: self.email.clone().unwrap_or_default(),
            contact: self.contact.clone(),
            address: self.address.clone(),
            city: self.city.clone(),
            pincode: self.pincode.clone(),
            monthly_bill: self.monthly_bill.as_deref().and_then(parse_float),
            terrace_area: self.terrace_area.as_deref().and_then(parse_float),
            grid_knowledge: self.grid_knowledge.clone(),
            monthly_consumption: consumption(self.monthly_consumption.as_deref()),
            peak_consumption: consumption(self.peak_consumption.as_deref()),
            lowest_consumption: consumption(self.lowest_consumption.as_deref()),
        }
    }
}
