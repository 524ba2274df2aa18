/// Result of a multi-step write whose secondary step may not have applied.
///
/// The primary value is always present. `warning` is set when the follow-up
/// mutation on the related record found nothing to update, leaving the data
/// with an orphaned reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome<T> {
    pub value: T,
    pub warning: Option<String>,
}

impl<T> Outcome<T> {
    pub fn complete(value: T) -> Self {
        Self { value, warning: None }
    }

    pub fn partial(value: T, warning: impl Into<String>) -> Self {
        Self {
            value,
            warning: Some(warning.into()),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.warning.is_none()
    }
}
