/// Object-storage layout shared with the training container and the simulator.
///
/// Everything lives in one bucket:
/// `s3://<bucket>/<prefix>/...` for checkpoints and job output,
/// `s3://<bucket>/custom_files/model_metadata.json` for the action space, and
/// `s3://<bucket>/rl-deepracer-pretrained/` for an optional starting model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageLayout {
    bucket: String,
    prefix: String,
}

pub const MODEL_METADATA_KEY: &str = "custom_files/model_metadata.json";
pub const PRETRAINED_PREFIX: &str = "rl-deepracer-pretrained";

impl StorageLayout {
    #[must_use]
    pub fn new(bucket: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self { bucket: bucket.into(), prefix: prefix.into() }
    }

    #[must_use]
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Output path handed to the service; it appends the job name itself.
    #[must_use]
    pub fn output_path(&self) -> String {
        format!("s3://{}/", self.bucket)
    }

    #[must_use]
    pub fn job_location(&self) -> String {
        format!("s3://{}/{}", self.bucket, self.prefix)
    }

    #[must_use]
    pub fn model_metadata_uri(&self) -> String {
        format!("s3://{}/{}", self.bucket, MODEL_METADATA_KEY)
    }

    #[must_use]
    pub fn pretrained_prefix(&self) -> &'static str {
        PRETRAINED_PREFIX
    }

    /// Where the packaged source bundle is expected for a given job.
    #[must_use]
    pub fn submit_directory(&self, job_name: &str) -> String {
        format!("s3://{}/{}/source/sourcedir.tar.gz", self.bucket, job_name)
    }
}
