// Call ID Provider Port (for deterministic testing)

/// Call id provider interface (allows deterministic ids in tests)
///
/// The id tags the call's log span and its staged credential file names.
pub trait CallIdProvider: Send + Sync {
    /// Generate an id for a new call
    fn generate_id(&self) -> String;
}

/// UUID v4 provider (production)
pub struct UuidProvider;

impl CallIdProvider for UuidProvider {
    fn generate_id(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}
