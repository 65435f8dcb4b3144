//! Resume archive in S3 / MinIO.

use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use bytes::Bytes;
use std::path::Path;
use tracing::{info, warn};
use uuid::Uuid;

/// `resumes/<screening_id>/<file name>`. Directory components of the
/// client-supplied name are discarded.
pub fn resume_key(screening_id: Uuid, resume_name: &str) -> String {
    let file_name = Path::new(resume_name)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "resume.pdf".to_string());
    format!("resumes/{screening_id}/{file_name}")
}

/// Uploads one resume. Returns the key on success; a failed upload is logged
/// and the candidate is screened without an archived copy.
pub async fn upload_resume(
    s3: &S3Client,
    bucket: &str,
    screening_id: Uuid,
    resume_name: &str,
    bytes: Bytes,
) -> Option<String> {
    let key = resume_key(screening_id, resume_name);
    match s3
        .put_object()
        .bucket(bucket)
        .key(&key)
        .body(ByteStream::from(bytes))
        .content_type("application/pdf")
        .send()
        .await
    {
        Ok(_) => {
            info!("Uploaded resume to s3://{bucket}/{key}");
            Some(key)
        }
        Err(e) => {
            warn!("S3 upload failed for {resume_name}: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resume_key_layout() {
        let id = Uuid::nil();
        assert_eq!(
            resume_key(id, "jane_doe.pdf"),
            "resumes/00000000-0000-0000-0000-000000000000/jane_doe.pdf"
        );
    }

    #[test]
    fn test_resume_key_strips_directories() {
        let id = Uuid::nil();
        assert!(resume_key(id, "../../etc/passwd.pdf").ends_with("/passwd.pdf"));
        assert!(resume_key(id, "uploads/cv.pdf").ends_with(&format!("{id}/cv.pdf")));
    }

    #[test]
    fn test_resume_key_fallback_name() {
        assert!(resume_key(Uuid::nil(), "..").ends_with("/resume.pdf"));
    }
}
