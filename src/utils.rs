use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::error::Result;

/// Serializes `obj` as JSON to `path`, creating missing parent directories.
///
/// A failed write is not cleaned up and may leave a truncated file behind.
pub fn save_object<P, T>(path: P, obj: &T) -> Result<()>
where
    P: AsRef<Path>,
    T: Serialize + ?Sized,
{
    let path = path.as_ref();
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }

    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, obj)?;
    writer.flush()?;
    debug!(path = %path.display(), "Object saved");
    Ok(())
}

pub fn load_object<P, T>(path: P) -> Result<T>
where
    P: AsRef<Path>,
    T: DeserializeOwned,
{
    let reader = BufReader::new(File::open(path.as_ref())?);
    let obj = serde_json::from_reader(reader)?;
    Ok(obj)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde::Deserialize;
    use std::collections::BTreeMap;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Stats {
        name: String,
        medians: Vec<f64>,
        vocab: BTreeMap<String, Vec<String>>,
    }

    fn sample() -> Stats {
        let mut vocab = BTreeMap::new();
        vocab.insert("lunch".to_string(), vec!["free/reduced".to_string(), "standard".to_string()]);
        Stats {
            name: "preprocessor".to_string(),
            medians: vec![69.0, 70.5],
            vocab,
        }
    }

    #[test]
    fn test_save_creates_parents_and_round_trips() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("artifacts").join("deep").join("obj.json");
        save_object(&path, &sample()).unwrap();

        let loaded: Stats = load_object(&path).unwrap();
        assert_eq!(loaded, sample());
    }

    #[test]
    fn test_save_twice_same_path() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("obj.json");
        save_object(&path, &sample()).unwrap();
        save_object(&path, &sample()).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_save_into_file_as_directory_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("blocker");
        fs::write(&blocker, b"x").unwrap();

        let err = save_object(blocker.join("obj.json"), &sample()).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::Io(_)));
        assert!(err.to_string().contains("utils.rs"));
    }

    #[test]
    fn test_load_wrong_shape() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("obj.json");
        fs::write(&path, b"[1, 2, 3]").unwrap();

        let err = load_object::<_, Stats>(&path).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::Serialization(_)));
    }
}
