//! Analytics dashboard state

use sqlcoach_core::{DetailedAnalytics, LearningPath, UserAnalytics};

/// The three analytics responses, fetched together
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnalysisData {
    pub analytics: UserAnalytics,
    pub detailed: DetailedAnalytics,
    pub learning_path: LearningPath,
}

impl AnalysisData {
    /// No attempts yet: show the "start practicing" empty state
    pub fn is_empty(&self) -> bool {
        self.analytics.total_questions_attempted == 0
    }

    /// Accuracy as a whole percentage; accepts 0-1 or 0-100 from the backend
    pub fn accuracy_percent(&self) -> u32 {
        let accuracy = self.analytics.overall_accuracy;
        let percent = if accuracy <= 1.0 {
            accuracy * 100.0
        } else {
            accuracy
        };
        percent.clamp(0.0, 100.0).round() as u32
    }
}

#[derive(Debug, Clone, Default)]
pub struct AnalysisState {
    pub loading: bool,
    pub data: Option<AnalysisData>,
    pub scroll: u16,
    generation: u64,
}

impl AnalysisState {
    pub fn begin_request(&mut self) -> u64 {
        self.loading = true;
        self.generation += 1;
        self.generation
    }

    pub fn accepts(&self, generation: u64) -> bool {
        self.generation == generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_when_no_attempts() {
        assert!(AnalysisData::default().is_empty());
    }

    #[test]
    fn test_accuracy_accepts_both_scales() {
        let mut data = AnalysisData::default();
        data.analytics.overall_accuracy = 0.755;
        assert_eq!(data.accuracy_percent(), 76);
        data.analytics.overall_accuracy = 62.0;
        assert_eq!(data.accuracy_percent(), 62);
    }

    #[test]
    fn test_only_latest_request_accepted() {
        let mut state = AnalysisState::default();
        let old = state.begin_request();
        let new = state.begin_request();
        assert!(!state.accepts(old));
        assert!(state.accepts(new));
    }
}
