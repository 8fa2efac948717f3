// Chat-platform webhook: envelope parsing, retry suppression, reply composition.
// Signature verification is left to the ingress in front of this service.

pub mod handlers;
pub mod payload;
pub mod reply;
