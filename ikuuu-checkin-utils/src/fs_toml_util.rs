use std::path::Path;

use anyhow::Context;
use serde::de::DeserializeOwned;

/// Reads and deserializes a TOML file.
/// Errors name both the file and the target type.
pub fn read_toml<T: DeserializeOwned>(path: impl AsRef<Path>) -> anyhow::Result<T> {
    let path = path.as_ref();
    let source = fs_err::read_to_string(path)?;
    toml::from_str(&source).with_context(|| {
        format!(
            "{} is not a valid {}",
            path.display(),
            std::any::type_name::<T>()
        )
    })
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::read_toml;

    #[derive(Debug, Deserialize)]
    struct Sample {
        name: String,
        #[serde(default)]
        values: Vec<u32>,
    }

    #[test]
    fn reads_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.toml");
        fs_err::write(&path, "name = \"abc\"\nvalues = [1, 2]\n").unwrap();
        let sample: Sample = read_toml(&path).unwrap();
        assert_eq!(sample.name, "abc");
        assert_eq!(sample.values, [1, 2]);
    }

    #[test]
    fn missing_file_mentions_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let err = read_toml::<Sample>(&path).unwrap_err();
        assert!(format!("{err:#}").contains("absent.toml"));
    }

    #[test]
    fn malformed_file_mentions_path_and_type() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        fs_err::write(&path, "name = ").unwrap();
        let message = format!("{:#}", read_toml::<Sample>(&path).unwrap_err());
        assert!(message.contains("broken.toml"));
        assert!(message.contains("Sample"));
    }
}
