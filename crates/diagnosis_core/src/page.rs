//! Page-level controller for the diagnosis flow
//!
//! Owns the image intake, the environment form, the step state and the one
//! live result. Network I/O happens outside: a host calls
//! [`DiagnosisPage::begin_submission`], performs the request, then hands the
//! outcome to [`DiagnosisPage::complete_submission`].

use crate::error::{CoreError, Result, SubmissionError};
use crate::flow::{transition, GateInput, Step};
use crate::form::{EnvField, EnvironmentForm};
use crate::intake::{ImageFile, ImageIntake, PreviewUrls, UploadedImage};
use crate::submission::{
    fallback_result, interpret_reply, FallbackPolicy, RawReply, SubmissionRequest, Ticket,
};
use crate::types::{DiagnosisResult, EnvironmentRecord, SoilStatus, Weather};

/// A result together with the environment it was submitted with
#[derive(Debug, Clone, PartialEq)]
pub struct ResultView {
    pub result: DiagnosisResult,
    pub environment: EnvironmentRecord,
}

/// Side effects the view should apply after a state change
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageEffects {
    /// Blocking message for the user
    pub alert: Option<String>,
    pub scroll_to_top: bool,
}

/// What to render; input mode and result mode never overlap
#[derive(Debug)]
pub enum PageView<'a> {
    Input {
        step: Step,
        image: Option<&'a UploadedImage>,
        environment: &'a EnvironmentRecord,
        loading: bool,
    },
    Result(&'a ResultView),
}

#[derive(Debug)]
pub struct DiagnosisPage<P: PreviewUrls> {
    intake: ImageIntake<P>,
    form: EnvironmentForm,
    step: Step,
    result: Option<ResultView>,
    in_flight: Option<(Ticket, EnvironmentRecord)>,
    next_ticket: u64,
    policy: FallbackPolicy,
}

impl<P: PreviewUrls> DiagnosisPage<P> {
    /// Mount a fresh page
    pub fn new(previews: P) -> Self {
        Self::with_policy(previews, FallbackPolicy::default())
    }

    pub fn with_policy(previews: P, policy: FallbackPolicy) -> Self {
        Self {
            intake: ImageIntake::new(previews),
            form: EnvironmentForm::new(),
            step: Step::Upload,
            result: None,
            in_flight: None,
            next_ticket: 0,
            policy,
        }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn policy(&self) -> FallbackPolicy {
        self.policy
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Submit control state: enabled only with an image and nothing in flight
    pub fn can_submit(&self) -> bool {
        self.step == Step::Environment && self.intake.has_image() && !self.is_loading()
    }

    pub fn image(&self) -> Option<&UploadedImage> {
        self.intake.image()
    }

    pub fn previews(&self) -> &P {
        self.intake.previews()
    }

    pub fn environment(&self) -> &EnvironmentRecord {
        self.form.record()
    }

    pub fn result(&self) -> Option<&ResultView> {
        self.result.as_ref()
    }

    pub fn view(&self) -> PageView<'_> {
        match (&self.result, self.step) {
            (Some(result), Step::Result) => PageView::Result(result),
            _ => PageView::Input {
                step: self.step,
                image: self.intake.image(),
                environment: self.form.record(),
                loading: self.is_loading(),
            },
        }
    }

    pub fn set_image(&mut self, file: ImageFile) -> &UploadedImage {
        self.intake.set_image(file)
    }

    pub fn clear_image(&mut self) {
        self.intake.clear_image();
    }

    pub fn set_field(&mut self, field: EnvField, value: &str) -> Result<()> {
        self.form.set_field(field, value)
    }

    pub fn select_soil(&mut self, soil: SoilStatus) {
        self.form.select_soil(soil);
    }

    pub fn select_weather(&mut self, weather: Weather) {
        self.form.select_weather(weather);
    }

    /// Step 1 → 2; refused without an image
    pub fn go_to_environment(&mut self) -> Result<()> {
        self.step = transition(self.step, Step::Environment, self.gate(false))?;
        Ok(())
    }

    /// Step 2 → 1; abandons any request still in flight
    pub fn back_to_upload(&mut self) -> Result<()> {
        self.step = transition(self.step, Step::Upload, self.gate(false))?;
        self.cancel_submission();
        Ok(())
    }

    /// Start a submission, if the preconditions hold
    pub fn begin_submission(&mut self) -> Result<SubmissionRequest> {
        let image = self.intake.image().ok_or(CoreError::NoImage)?;
        if self.in_flight.is_some() {
            return Err(CoreError::SubmissionInFlight);
        }
        if self.step != Step::Environment {
            return Err(CoreError::InvalidTransition {
                from: self.step,
                to: Step::Result,
            });
        }

        let ticket = Ticket(self.next_ticket);
        self.next_ticket += 1;

        let request = SubmissionRequest {
            ticket,
            image: image.file.clone(),
            env: self.form.record().clone(),
        };
        self.in_flight = Some((ticket, request.env.clone()));
        tracing::debug!(ticket = ticket.0, image = %request.image.name, "submission started");
        Ok(request)
    }

    /// Apply the outcome of the request issued for `ticket`
    pub fn complete_submission(
        &mut self,
        ticket: Ticket,
        outcome: std::result::Result<RawReply, SubmissionError>,
    ) -> Result<PageEffects> {
        let environment = match self.in_flight.take() {
            Some((current, environment)) if current == ticket => environment,
            other => {
                self.in_flight = other;
                return Err(CoreError::StaleSubmission);
            }
        };

        let mut effects = PageEffects {
            alert: None,
            scroll_to_top: true,
        };

        let result = match outcome.and_then(|reply| interpret_reply(&reply)) {
            Ok(result) => Some(result),
            Err(SubmissionError::Cancelled) => None,
            Err(err) => {
                tracing::warn!(ticket = ticket.0, %err, "diagnosis request failed");
                effects.alert = Some(format!("Error processing request: {err}"));
                match self.policy {
                    FallbackPolicy::Demo => Some(fallback_result()),
                    FallbackPolicy::Disabled => None,
                }
            }
        };

        if let Some(result) = result {
            self.step = transition(self.step, Step::Result, self.gate(true))?;
            self.result = Some(ResultView {
                result,
                environment,
            });
        }
        Ok(effects)
    }

    /// Abandon the in-flight request; its reply will be rejected as stale
    pub fn cancel_submission(&mut self) -> bool {
        let cancelled = self.in_flight.take().is_some();
        if cancelled {
            tracing::debug!("submission cancelled");
        }
        cancelled
    }

    /// Result → step 1, discarding the result, the image and the form
    pub fn new_diagnosis(&mut self) -> Result<()> {
        self.step = transition(self.step, Step::Upload, self.gate(false))?;
        self.result = None;
        self.intake.clear_image();
        self.form.reset();
        Ok(())
    }

    /// Unmount: releases the preview and abandons any request
    pub fn teardown(&mut self) {
        self.cancel_submission();
        self.intake.clear_image();
        self.result = None;
        self.form.reset();
        self.step = Step::Upload;
    }

    fn gate(&self, submission_completed: bool) -> GateInput {
        GateInput {
            has_image: self.intake.has_image(),
            submission_completed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::input_value;
    use crate::intake::InMemoryPreviews;
    use crate::types::Severity;

    const OK_BODY: &str = r#"{"prediction": {"disease": "Cotton___Fusarium_wilt", "severity": "Medium", "confidence": 0.87}, "remedy": "Rotate crops", "explanation_img": "abc123"}"#;

    fn leaf() -> ImageFile {
        ImageFile::new("leaf.jpg", vec![0xFF, 0xD8, 0xFF, 0xDB]).with_mime_type("image/jpeg")
    }

    fn page_at_environment() -> DiagnosisPage<InMemoryPreviews> {
        let mut page = DiagnosisPage::new(InMemoryPreviews::new());
        page.set_image(leaf());
        page.go_to_environment().unwrap();
        page
    }

    #[test]
    fn test_next_refused_without_image() {
        let mut page = DiagnosisPage::new(InMemoryPreviews::new());
        assert_eq!(page.go_to_environment(), Err(CoreError::NoImage));
        assert_eq!(page.step(), Step::Upload);

        page.set_image(leaf());
        assert!(page.go_to_environment().is_ok());
        assert_eq!(page.step(), Step::Environment);
    }

    #[test]
    fn test_submit_without_image_is_blocked() {
        let mut page = page_at_environment();
        page.clear_image();
        assert_eq!(page.begin_submission().unwrap_err(), CoreError::NoImage);
        assert!(!page.is_loading());
    }

    #[test]
    fn test_empty_environment_is_sent_as_nulls() {
        let mut page = page_at_environment();
        let request = page.begin_submission().unwrap();
        assert_eq!(
            request.env_json(),
            r#"{"location":null,"temp":null,"humidity":null,"soil_status":null,"weather":null}"#
        );
        assert_eq!(request.image.name, "leaf.jpg");
    }

    #[test]
    fn test_second_submission_refused_while_in_flight() {
        let mut page = page_at_environment();
        page.begin_submission().unwrap();
        assert!(page.is_loading());
        assert!(!page.can_submit());
        assert_eq!(
            page.begin_submission().unwrap_err(),
            CoreError::SubmissionInFlight
        );
    }

    #[test]
    fn test_successful_reply_enters_result_mode() {
        let mut page = page_at_environment();
        page.set_field(EnvField::Location, "Nagpur").unwrap();
        let request = page.begin_submission().unwrap();

        let effects = page
            .complete_submission(request.ticket, Ok(RawReply::new(200, OK_BODY)))
            .unwrap();

        assert_eq!(effects.alert, None);
        assert!(effects.scroll_to_top);
        assert!(!page.is_loading());
        assert_eq!(page.step(), Step::Result);
        match page.view() {
            PageView::Result(view) => {
                assert_eq!(view.result.prediction.disease, "Cotton___Fusarium_wilt");
                assert_eq!(view.environment.location.as_deref(), Some("Nagpur"));
            }
            PageView::Input { .. } => panic!("expected result mode"),
        }
    }

    #[test]
    fn test_server_error_alerts_and_falls_back() {
        let mut page = page_at_environment();
        let request = page.begin_submission().unwrap();

        let effects = page
            .complete_submission(request.ticket, Ok(RawReply::new(500, "Internal Error")))
            .unwrap();

        let alert = effects.alert.unwrap();
        assert!(alert.contains("Internal Error"));
        assert!(effects.scroll_to_top);
        assert_eq!(page.step(), Step::Result);
        let view = page.result().unwrap();
        assert_eq!(view.result.prediction.disease, "Late Blight");
        assert_eq!(view.result.prediction.severity, Severity::High);
        assert!(view.result.is_fallback());
    }

    #[test]
    fn test_transport_error_without_fallback_stays_in_input_mode() {
        let mut page = DiagnosisPage::with_policy(InMemoryPreviews::new(), FallbackPolicy::Disabled);
        page.set_image(leaf());
        page.go_to_environment().unwrap();
        let request = page.begin_submission().unwrap();

        let effects = page
            .complete_submission(
                request.ticket,
                Err(SubmissionError::Transport("connection refused".into())),
            )
            .unwrap();

        assert!(effects.alert.unwrap().contains("connection refused"));
        assert_eq!(page.step(), Step::Environment);
        assert!(page.result().is_none());
        assert!(page.can_submit());
    }

    #[test]
    fn test_cancelled_reply_is_stale() {
        let mut page = page_at_environment();
        let request = page.begin_submission().unwrap();
        assert!(page.cancel_submission());

        let err = page
            .complete_submission(request.ticket, Ok(RawReply::new(200, OK_BODY)))
            .unwrap_err();
        assert_eq!(err, CoreError::StaleSubmission);
        assert_eq!(page.step(), Step::Environment);
        assert!(page.result().is_none());
    }

    #[test]
    fn test_back_navigation_abandons_request() {
        let mut page = page_at_environment();
        let first = page.begin_submission().unwrap();
        page.back_to_upload().unwrap();
        page.go_to_environment().unwrap();
        let second = page.begin_submission().unwrap();

        assert_ne!(first.ticket, second.ticket);
        assert_eq!(
            page.complete_submission(first.ticket, Ok(RawReply::new(200, OK_BODY))),
            Err(CoreError::StaleSubmission)
        );
        assert!(page.is_loading());
        assert!(page
            .complete_submission(second.ticket, Ok(RawReply::new(200, OK_BODY)))
            .is_ok());
    }

    #[test]
    fn test_new_diagnosis_clears_image_and_result() {
        let mut page = page_at_environment();
        let preview = page.image().unwrap().preview.clone();
        page.select_weather(Weather::Rainy);
        let request = page.begin_submission().unwrap();
        page.complete_submission(request.ticket, Ok(RawReply::new(200, OK_BODY)))
            .unwrap();

        page.new_diagnosis().unwrap();

        assert_eq!(page.step(), Step::Upload);
        assert!(page.result().is_none());
        assert!(page.image().is_none());
        assert!(!page.previews().is_live(&preview));
        assert!(page.environment().is_empty());
        assert!(matches!(page.view(), PageView::Input { image: None, .. }));
    }

    #[test]
    fn test_environment_is_frozen_at_submission() {
        let mut page = page_at_environment();
        page.select_soil(SoilStatus::Dry);
        let request = page.begin_submission().unwrap();
        page.select_soil(SoilStatus::Wet);

        page.complete_submission(request.ticket, Ok(RawReply::new(200, OK_BODY)))
            .unwrap();
        assert_eq!(
            page.result().unwrap().environment.soil_status,
            Some(SoilStatus::Dry)
        );
    }

    #[test]
    fn test_teardown_releases_preview() {
        let mut page = page_at_environment();
        page.teardown();
        assert_eq!(page.previews().live_count(), 0);
        assert_eq!(page.previews().double_revokes(), 0);
        assert_eq!(page.step(), Step::Upload);
    }

    #[test]
    fn test_back_and_next_keeps_environment_for_redisplay() {
        let mut page = page_at_environment();
        page.set_field(EnvField::Location, "Nagpur").unwrap();
        page.set_field(EnvField::Temp, "29").unwrap();

        page.back_to_upload().unwrap();
        page.go_to_environment().unwrap();

        match page.view() {
            PageView::Input { environment, .. } => {
                assert_eq!(input_value(environment, EnvField::Location), "Nagpur");
                assert_eq!(input_value(environment, EnvField::Temp), "29");
                assert_eq!(input_value(environment, EnvField::Humidity), "");
            }
            PageView::Result(_) => panic!("expected input mode"),
        }
        let request = page.begin_submission().unwrap();
        assert_eq!(request.env.location.as_deref(), Some("Nagpur"));
    }
}
