//! Receiver/processor tree construction from session values and overrides.

use serde_json::{json, Map, Value};

use crate::tree::{Bitdepth, ConfigTree, DefaultsDocument, TreeResult};

const HDF: &str = "hdf";

/// Scalar session values that the processor's `hdf` leaves are derived from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    /// Number of frames to write.
    pub frames: u64,

    /// Directory the processor writes into.
    pub file_path: String,

    /// File name the processor writes.
    pub file_name: String,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            frames: 1,
            file_path: "/tmp".to_string(),
            file_name: "test.hdf5".to_string(),
        }
    }
}

/// Owns the session state, both configuration trees and the processor plugin chain.
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    session: SessionState,
    receiver: ConfigTree,
    processor: ConfigTree,
    plugins: Vec<Map<String, Value>>,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn receiver(&self) -> &ConfigTree {
        &self.receiver
    }

    pub fn processor(&self) -> &ConfigTree {
        &self.processor
    }

    pub fn plugins(&self) -> &[Map<String, Value>] {
        &self.plugins
    }

    /// Parse a defaults document and install whichever sections it carries.
    ///
    /// A malformed document leaves the trees and plugin chain untouched.
    pub fn load_defaults(&mut self, text: &str) -> TreeResult<()> {
        let document = DefaultsDocument::parse(text)?;
        self.apply_defaults(document);
        Ok(())
    }

    /// Install the sections present in `document`, replacing the current ones.
    pub fn apply_defaults(&mut self, document: DefaultsDocument) {
        if let Some(receiver) = document.receiver_default_config {
            tracing::debug!(keys = receiver.len(), "Loaded receiver default config");
            self.receiver = ConfigTree::from(receiver);
        }
        if let Some(processor) = document.processor_default_config {
            tracing::debug!(keys = processor.len(), "Loaded processor default config");
            self.processor = ConfigTree::from(processor);
        }
        if let Some(plugins) = document.processor_plugins {
            tracing::debug!(count = plugins.len(), "Loaded processor plugin chain");
            self.plugins = plugins;
        }
    }

    /// Set the frame count; writes `processor.hdf.frames`.
    pub fn set_num_frames(&mut self, frames: u64) -> TreeResult<()> {
        self.session.frames = frames;
        self.processor.set_leaf(&[HDF], "frames", json!(frames))
    }

    /// Set the output directory; writes `processor.hdf.file.path`.
    pub fn set_file_path(&mut self, file_path: &str) -> TreeResult<()> {
        self.session.file_path = file_path.to_string();
        self.processor.set_leaf(&[HDF, "file"], "path", json!(file_path))
    }

    /// Set the output file name; writes `processor.hdf.file.name`.
    pub fn set_file_name(&mut self, file_name: &str) -> TreeResult<()> {
        self.session.file_name = file_name.to_string();
        self.processor.set_leaf(&[HDF, "file"], "name", json!(file_name))
    }

    /// Set the bitdepth on both trees and the matching processor dataset type.
    pub fn set_bitdepth(&mut self, bits: u32) -> TreeResult<()> {
        let bitdepth = Bitdepth::try_from(bits)?;
        let label = bitdepth.to_string();

        self.receiver
            .set_leaf(&["decoder_config"], "bitdepth", json!(label))?;
        self.processor.set_leaf(&["excalibur"], "bitdepth", json!(label))?;
        self.processor.set_leaf(
            &[HDF, "dataset", "data"],
            "datatype",
            json!(bitdepth.datatype()),
        )
    }

    /// Refresh the `hdf` leaves from the session, set `hdf.write`, and return `{"hdf": ...}`.
    ///
    /// Only the `hdf` subtree is returned so that enabling or disabling writing does not
    /// push unrelated processor configuration.
    pub fn file_writing_params(&mut self, enabled: bool) -> TreeResult<Map<String, Value>> {
        let SessionState {
            frames,
            file_path,
            file_name,
        } = self.session.clone();

        self.set_file_name(&file_name)?;
        self.set_file_path(&file_path)?;
        self.set_num_frames(frames)?;

        let hdf = self.processor.ensure_section(HDF)?;
        hdf.insert("write".to_string(), json!(enabled));

        let mut params = Map::new();
        params.insert(HDF.to_string(), Value::Object(hdf.clone()));
        Ok(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::TreeError;

    #[test]
    fn test_session_defaults() {
        let builder = ConfigBuilder::new();
        assert_eq!(builder.session().frames, 1);
        assert_eq!(builder.session().file_path, "/tmp");
        assert_eq!(builder.session().file_name, "test.hdf5");
        assert!(builder.processor().is_empty());
        assert!(builder.receiver().is_empty());
    }

    #[test]
    fn test_bitdepth_twelve() {
        let mut builder = ConfigBuilder::new();
        builder.set_bitdepth(12).unwrap();

        let processor = builder.processor();
        assert_eq!(processor.get(&["excalibur", "bitdepth"]), Some(&json!("12-bit")));
        assert_eq!(
            processor.get(&["hdf", "dataset", "data", "datatype"]),
            Some(&json!(1))
        );
        assert_eq!(
            builder.receiver().get(&["decoder_config", "bitdepth"]),
            Some(&json!("12-bit"))
        );
    }

    #[test]
    fn test_bitdepth_invalid_leaves_trees_alone() {
        let mut builder = ConfigBuilder::new();
        let err = builder.set_bitdepth(16).unwrap_err();
        assert!(matches!(err, TreeError::InvalidBitdepth(16)));
        assert!(builder.processor().is_empty());
        assert!(builder.receiver().is_empty());
    }

    #[test]
    fn test_setters_preserve_defaults() {
        let mut builder = ConfigBuilder::new();
        builder
            .load_defaults(r#"{"processor_default_config": {"hdf": {"acquisition_id": "a1", "file": {"extension": "h5"}}}}"#)
            .unwrap();

        builder.set_num_frames(10).unwrap();
        builder.set_file_path("/data").unwrap();
        builder.set_file_name("run.h5").unwrap();

        let processor = builder.processor();
        assert_eq!(processor.get(&["hdf", "acquisition_id"]), Some(&json!("a1")));
        assert_eq!(processor.get(&["hdf", "file", "extension"]), Some(&json!("h5")));
        assert_eq!(processor.get(&["hdf", "frames"]), Some(&json!(10)));
        assert_eq!(processor.get(&["hdf", "file", "path"]), Some(&json!("/data")));
        assert_eq!(processor.get(&["hdf", "file", "name"]), Some(&json!("run.h5")));
    }

    #[test]
    fn test_file_writing_params_only_hdf() {
        let mut builder = ConfigBuilder::new();
        builder.set_bitdepth(24).unwrap();
        builder.set_file_name("scan.h5").unwrap();
        builder.set_num_frames(100).unwrap();

        let params = builder.file_writing_params(true).unwrap();

        assert_eq!(params.len(), 1);
        let hdf = &params["hdf"];
        assert_eq!(hdf["frames"], json!(100));
        assert_eq!(hdf["file"]["path"], json!("/tmp"));
        assert_eq!(hdf["file"]["name"], json!("scan.h5"));
        assert_eq!(hdf["write"], json!(true));
        assert_eq!(hdf["dataset"]["data"]["datatype"], json!(2));
        assert_eq!(builder.processor().get(&["hdf", "write"]), Some(&json!(true)));
    }

    #[test]
    fn test_malformed_defaults_untouched() {
        let mut builder = ConfigBuilder::new();
        builder
            .load_defaults(r#"{"receiver_default_config": {"rx_ports": "61649"}}"#)
            .unwrap();

        assert!(builder.load_defaults(r#"{"receiver_default_config": {}"#).is_err());
        assert!(builder
            .load_defaults(r#"{"processor_default_config": {"x": 1}, "processor_plugins": 5}"#)
            .is_err());

        assert_eq!(
            builder.receiver().get(&["rx_ports"]),
            Some(&json!("61649"))
        );
        assert!(builder.processor().is_empty());
        assert!(builder.plugins().is_empty());
    }
}
