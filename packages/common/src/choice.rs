use thiserror::Error;

/// Error when a submitted value is not one of an enum's choices.
///
/// The message is phrased for direct display next to a form field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Select a valid choice. {value} is not one of the available choices.")]
pub struct ParseChoiceError {
    pub value: String,
}

/// A closed set of values stored as a short code and shown with a label.
pub trait Choice: Sized + Copy + 'static {
    /// Every variant, in display order.
    const ALL: &'static [Self];

    /// Stored representation.
    fn code(&self) -> &'static str;

    /// Human-readable representation.
    fn label(&self) -> &'static str;

    /// Parse either the code or the label, ignoring ASCII case and surrounding whitespace.
    fn parse_choice(s: &str) -> Result<Self, ParseChoiceError> {
        let s = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.code().eq_ignore_ascii_case(s) || c.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseChoiceError {
                value: s.to_string(),
            })
    }
}
