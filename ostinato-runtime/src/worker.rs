/// A unit of recurring work.
///
/// Implement this trait on your struct to make it schedulable. The
/// scheduler invokes `perform_work` from a single serialized execution
/// context, so no two runs ever overlap, not even across different
/// schedules. The call may take arbitrary wall-clock time; the schedule's
/// next wait shrinks by however long it took.
///
/// # Example
///
/// ```rust
/// use ostinato_runtime::Worker;
///
/// struct HeartbeatJob {
///     service: String,
/// }
///
/// impl Worker for HeartbeatJob {
///     fn perform_work(&self) {
///         println!("ping from {}", self.service);
///     }
/// }
/// ```
pub trait Worker: Send + Sync {
    /// Perform one unit of work. No result is observed by the scheduler.
    fn perform_work(&self);
}

/// Plain closures and functions are workers too.
impl<F> Worker for F
where
    F: Fn() + Send + Sync,
{
    fn perform_work(&self) {
        self()
    }
}
