use vrap_core::TemplateFile;

/// Relative path of the build metadata file.
pub const METADATA_PATH: &str = "gen.properties";

/// Create the build metadata file recording the generator's build id.
pub fn build_metadata(build_id: &str) -> TemplateFile {
    TemplateFile::new(METADATA_PATH, format!("hash={}", build_id))
}
