use log::info;

/// Fire-and-forget user-visible messages. Implementations must never let
/// a delivery problem abort the operation that triggered them.
pub trait NotificationSink {
    fn notify(&self, message: &str);
}

/// Prints to stderr so notifications never mix with generated output on
/// stdout.
pub struct ConsoleNotifier;

impl NotificationSink for ConsoleNotifier {
    fn notify(&self, message: &str) {
        eprintln!("{}", message);
        info!("notified: {}", message);
    }
}
