use std::fmt;

/// Lifecycle of one generation attempt. `Success` and `Failed` are passed
/// through on the way back to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageState {
    Idle,
    Generating,
    Success,
    Failed,
}

impl PageState {
    pub fn can_transition_to(self, next: PageState) -> bool {
        matches!(
            (self, next),
            (PageState::Idle, PageState::Generating)
                | (PageState::Generating, PageState::Success)
                | (PageState::Generating, PageState::Failed)
                | (PageState::Success, PageState::Idle)
                | (PageState::Failed, PageState::Idle)
        )
    }
}

impl fmt::Display for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PageState::Idle => "idle",
            PageState::Generating => "generating",
            PageState::Success => "success",
            PageState::Failed => "failed",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_transitions() {
        assert!(PageState::Idle.can_transition_to(PageState::Generating));
        assert!(PageState::Generating.can_transition_to(PageState::Failed));
        assert!(PageState::Success.can_transition_to(PageState::Idle));

        assert!(!PageState::Idle.can_transition_to(PageState::Success));
        assert!(!PageState::Generating.can_transition_to(PageState::Generating));
        assert!(!PageState::Failed.can_transition_to(PageState::Generating));
    }
}
