use invitekit_core::AggregateId;

/// Intent to change exactly one aggregate.
///
/// Commands are transient; accepted commands become events. Tenant scoping is
/// carried by the command payloads themselves and checked by the aggregate.
pub trait Command: Clone + core::fmt::Debug + Send + Sync + 'static {
    fn target_aggregate_id(&self) -> AggregateId;
}
