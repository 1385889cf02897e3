//! Collects information about the version of the crate from Git and the build
//! environment. It is exposed at runtime through [`rankfile::version`] and
//! reported by the UCI `id name` reply.

fn main() -> shadow_rs::SdResult<()> {
    shadow_rs::new()
}
