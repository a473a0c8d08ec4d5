pub(super) mod health;
pub(super) mod messages;
pub(super) mod sse;
