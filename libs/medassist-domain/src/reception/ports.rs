use super::ReceptionRecord;

/// Port notified after a reception request has been persisted
///
/// `notify` is synchronous and infallible on purpose: it only hands the
/// record over (typically to a background dispatcher). Whatever happens to
/// the notification afterwards cannot affect the request that produced it.
#[cfg_attr(test, mockall::automock)]
pub trait IntakeNotifier: Send + Sync {
    fn notify(&self, record: &ReceptionRecord);
}
