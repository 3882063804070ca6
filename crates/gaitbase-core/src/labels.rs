//! Label strings shared by the data-entry forms, the database and the reports.

/// Value stored for a numeric field that was never measured.
pub const NOT_MEASURED: &str = "Ei mitattu";

/// Checked checkbox.
pub const YES: &str = "Kyllä";

/// Unchecked checkbox. Upper-case for historical reasons; reports normally
/// rewrite it to "Ei".
pub const NO: &str = "EI";
