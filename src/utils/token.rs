use rand::{distributions::Alphanumeric, thread_rng, Rng};

/// Opaque bearer token for assessment invites.
pub fn generate_invite_token(length: usize) -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}
