use weblog_model::WorkflowEvent;

/// Observer of the events an engine accepts.
///
/// Called synchronously from inside a tick, once per event that parsed and
/// passed timestamp validation, in arrival order. Implementations must be cheap.
pub trait Subscribe: Send + Sync {
    fn on_event(&self, event: &WorkflowEvent);

    fn name(&self) -> &'static str;
}
