//! One diagnosis round trip for a [`DiagnosisPage`]
//!
//! The page refuses a second submission while one is in flight; cancelling
//! the token abandons the request and invalidates its ticket.

use crate::client::DiagnosisTransport;
use anyhow::Result;
use diagnosis_core::{DiagnosisPage, PageEffects, PreviewUrls};
use tokio_util::sync::CancellationToken;

/// How a submission ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Reply (or failure) applied to the page; the view should apply the effects
    Completed(PageEffects),
    /// Abandoned before the backend answered
    Cancelled,
}

/// Submit the page's current image and environment through `transport`
///
/// Precondition failures (no image, request already in flight) are returned
/// as errors without touching the network.
pub async fn submit<P, T>(
    page: &mut DiagnosisPage<P>,
    transport: &T,
    cancel: &CancellationToken,
) -> Result<SubmitOutcome>
where
    P: PreviewUrls,
    T: DiagnosisTransport + ?Sized,
{
    let request = page.begin_submission()?;

    let outcome = tokio::select! {
        reply = transport.send(&request) => reply,
        _ = cancel.cancelled() => {
            page.cancel_submission();
            tracing::info!(image = %request.image.name, "diagnosis request cancelled");
            return Ok(SubmitOutcome::Cancelled);
        }
    };

    let effects = page.complete_submission(request.ticket, outcome)?;
    if let Some(alert) = &effects.alert {
        tracing::warn!(%alert, fallback = page.result().is_some(), "diagnosis failed");
    }
    Ok(SubmitOutcome::Completed(effects))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use diagnosis_core::{
        CoreError, ImageFile, InMemoryPreviews, RawReply, Step, SubmissionError,
        SubmissionRequest,
    };
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CannedTransport {
        reply: Result<RawReply, SubmissionError>,
        calls: AtomicUsize,
    }

    impl CannedTransport {
        fn new(reply: Result<RawReply, SubmissionError>) -> Self {
            Self {
                reply,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl DiagnosisTransport for CannedTransport {
        async fn send(&self, _request: &SubmissionRequest) -> Result<RawReply, SubmissionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply.clone()
        }
    }

    struct NeverTransport;

    #[async_trait]
    impl DiagnosisTransport for NeverTransport {
        async fn send(&self, _request: &SubmissionRequest) -> Result<RawReply, SubmissionError> {
            std::future::pending().await
        }
    }

    fn ready_page() -> DiagnosisPage<InMemoryPreviews> {
        let mut page = DiagnosisPage::new(InMemoryPreviews::new());
        page.set_image(ImageFile::new("leaf.jpg", vec![0xFF, 0xD8, 0xFF]));
        page.go_to_environment().unwrap();
        page
    }

    #[tokio::test]
    async fn test_no_image_never_reaches_transport() {
        let mut page = ready_page();
        page.clear_image();
        let transport = CannedTransport::new(Ok(RawReply::new(200, "{}")));

        let err = submit(&mut page, &transport, &CancellationToken::new())
            .await
            .unwrap_err();

        assert_eq!(err.downcast_ref::<CoreError>(), Some(&CoreError::NoImage));
        assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_transport_failure_falls_back() {
        let mut page = ready_page();
        let transport = CannedTransport::new(Err(SubmissionError::Transport(
            "connection refused".to_string(),
        )));

        let outcome = submit(&mut page, &transport, &CancellationToken::new())
            .await
            .unwrap();

        match outcome {
            SubmitOutcome::Completed(effects) => {
                assert!(effects.alert.unwrap().contains("connection refused"));
                assert!(effects.scroll_to_top);
            }
            SubmitOutcome::Cancelled => panic!("not cancelled"),
        }
        assert_eq!(page.step(), Step::Result);
        assert!(page.result().unwrap().result.is_fallback());
    }

    #[tokio::test]
    async fn test_cancel_token_abandons_request() {
        let mut page = ready_page();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let outcome = submit(&mut page, &NeverTransport, &cancel).await.unwrap();

        assert_eq!(outcome, SubmitOutcome::Cancelled);
        assert!(!page.is_loading());
        assert_eq!(page.step(), Step::Environment);
    }
}
