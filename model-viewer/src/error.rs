use bevy::asset::AssetLoadError;

/// Why the model never reached the screen.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelLoadError {
    /// The asset bytes could not be read (missing file, network failure).
    #[error("model asset '{path}' is unreachable: {reason}")]
    Unreachable { path: String, reason: String },

    /// The bytes were read but could not be turned into a scene.
    #[error("model asset '{path}' could not be parsed: {reason}")]
    Invalid { path: String, reason: String },
}

impl ModelLoadError {
    pub fn from_asset_error(path: &str, error: &AssetLoadError) -> Self {
        match error {
            AssetLoadError::AssetReaderError(reader_error) => Self::Unreachable {
                path: path.to_string(),
                reason: reader_error.to_string(),
            },
            other => Self::Invalid {
                path: path.to_string(),
                reason: other.to_string(),
            },
        }
    }

    pub fn path(&self) -> &str {
        match self {
            Self::Unreachable { path, .. } | Self::Invalid { path, .. } => path,
        }
    }

    /// Short machine-readable tag for the host bridge.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unreachable { .. } => "unreachable",
            Self::Invalid { .. } => "invalid",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::asset::AssetPath;
    use bevy::asset::io::AssetReaderError;
    use std::path::PathBuf;

    #[test]
    fn display_names_path_and_reason() {
        let error = ModelLoadError::Unreachable {
            path: "models/missing.glb".into(),
            reason: "not found".into(),
        };
        assert_eq!(
            error.to_string(),
            "model asset 'models/missing.glb' is unreachable: not found"
        );
        assert_eq!(error.path(), "models/missing.glb");
        assert_eq!(error.kind(), "unreachable");
    }

    #[test]
    fn invalid_kind() {
        let error = ModelLoadError::Invalid {
            path: "models/broken.glb".into(),
            reason: "bad header".into(),
        };
        assert_eq!(error.kind(), "invalid");
        assert!(error.to_string().contains("could not be parsed"));
    }

    #[test]
    fn reader_errors_are_unreachable() {
        let error = AssetLoadError::AssetReaderError(AssetReaderError::NotFound(PathBuf::from(
            "models/missing.glb",
        )));
        let classified = ModelLoadError::from_asset_error("models/missing.glb", &error);
        assert!(matches!(classified, ModelLoadError::Unreachable { .. }));
        assert_eq!(classified.path(), "models/missing.glb");
    }

    #[test]
    fn loader_errors_are_invalid() {
        let error = AssetLoadError::MissingLabel {
            base_path: AssetPath::from("models/model.glb"),
            label: "Scene3".into(),
            all_labels: vec!["Scene0".into()],
        };
        let classified = ModelLoadError::from_asset_error("models/model.glb", &error);
        assert!(matches!(classified, ModelLoadError::Invalid { .. }));
        assert!(classified.to_string().contains("Scene3"));
    }
}
