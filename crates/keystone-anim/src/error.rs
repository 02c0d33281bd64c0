use keystone_scene::Entity;

/// Errors that can occur in the animation system.
#[derive(Debug, thiserror::Error)]
pub enum AnimError {
    #[error("entity {0} has no SkinnedMeshRenderer")]
    MissingRenderer(Entity),

    #[error("invalid skeleton: {0}")]
    InvalidSkeleton(String),

    #[error("invalid animation '{0}': {1}")]
    InvalidClip(String, String),

    #[error("failed to parse animation: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("failed to read animation: {0}")]
    Io(#[from] std::io::Error),
}
