use std::sync::Arc;

use bytes::Bytes;
use image::DynamicImage;
use resimg_core::models::{CropOffset, ResourceRef, SizeLabel, UploadOutcome};
use resimg_core::validation::canonical_filename;
use resimg_core::{StoreError, StoreResult};

use super::{storage_failure, ImageStore};
use crate::image::{ImageCrop, ImageProcessor};

impl ImageStore {
    /// Store an uploaded image as an original plus one derivative per
    /// configured size.
    ///
    /// Validation, decoding and cropping all happen before the first write,
    /// so a rejected upload leaves the tree untouched. Once the original is
    /// written, variants are produced in configured order; the first failure
    /// stops the upload and is reported as `PartialUploadFailure` listing the
    /// sizes already written. Files written before the failure stay in place.
    #[tracing::instrument(skip_all, fields(resource = %resource, id = id, filename = %filename))]
    pub async fn upload_image(
        &self,
        resource: &str,
        id: i64,
        filename: &str,
        data: Option<Bytes>,
        crops: &[CropOffset],
    ) -> StoreResult<UploadOutcome> {
        let target = self.resolve(resource, id)?;

        let data = data.filter(|d| !d.is_empty()).ok_or(StoreError::MissingFile)?;
        if data.len() > self.config.max_file_size_bytes {
            return Err(StoreError::InvalidImage(format!(
                "File of {} bytes exceeds maximum size of {} bytes",
                data.len(),
                self.config.max_file_size_bytes
            )));
        }

        let stored_name = canonical_filename(filename);
        let start = std::time::Instant::now();

        let transformer = self.transformer;
        let offsets = crops.to_vec();
        let (original, cropped) = self
            .run_blocking(move || {
                let img = ImageProcessor::decode(&data)?;
                let cropped = ImageCrop::apply_offsets(img.clone(), &offsets)?;
                let original = transformer.encode_original(&img)?;
                Ok((original, Arc::new(cropped)))
            })
            .await
            .map_err(|e| {
                tracing::debug!(error = %e, "Upload rejected");
                StoreError::from(e)
            })?;

        let root = self.paths.resource_id_root(&target.resource, target.id);
        self.storage
            .create_dir_all(&root)
            .await
            .map_err(|e| StoreError::storage(e.to_string()))?;

        let original_path = self
            .paths
            .original_path(&target.resource, target.id, &stored_name);
        let key = self.paths.relative_key(&original_path).ok_or_else(|| {
            StoreError::storage(format!(
                "{} is not below the store root",
                original_path.display()
            ))
        })?;
        self.storage
            .write(&original_path, original)
            .await
            .map_err(|e| {
                tracing::error!(path = %original_path.display(), error = %e, "Failed to write original");
                StoreError::storage(e.to_string())
            })?;

        let mut written = Vec::with_capacity(self.config.size_labels.len());
        for &size in &self.config.size_labels {
            if let Err(e) = self
                .write_variant(&target, &stored_name, Arc::clone(&cropped), size)
                .await
            {
                tracing::error!(
                    size = %size,
                    written = written.len(),
                    error = %e,
                    "Variant generation failed, upload is partial"
                );
                return Err(StoreError::PartialUploadFailure {
                    filename: stored_name,
                    written,
                    failed: size,
                    reason: e.to_string(),
                });
            }
            written.push(size);
        }

        tracing::info!(
            stored_as = %stored_name,
            variants = written.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Upload stored"
        );

        Ok(UploadOutcome {
            written: true,
            path: key,
            resource: target.resource,
            resource_id: target.id,
            filename: stored_name,
            sizes: written,
        })
    }

    async fn write_variant(
        &self,
        target: &ResourceRef,
        filename: &str,
        cropped: Arc<DynamicImage>,
        size: SizeLabel,
    ) -> StoreResult<()> {
        let label = size.to_string();
        self.storage
            .create_dir_all(&self.paths.size_dir(&target.resource, target.id, &label))
            .await
            .map_err(storage_failure)?;

        let transformer = self.transformer;
        let encoded = self
            .run_blocking(move || transformer.render_variant(&cropped, size))
            .await?;

        let path = self
            .paths
            .variant_path(&target.resource, target.id, &label, filename);
        self.storage.write(&path, encoded).await.map_err(storage_failure)?;

        tracing::debug!(size = %size, path = %path.display(), "Variant written");
        Ok(())
    }
}
