//! S3 backend for the [`ObjectStore`](crate::ObjectStore) trait

use crate::error::{StorageError, StorageResult};
use crate::location::ObjectLocation;
use crate::ObjectStore;
use async_trait::async_trait;
use aws_config::meta::region::RegionProviderChain;
use aws_config::BehaviorVersion;
use aws_sdk_s3::error::ProvideErrorMetadata;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{Delete, ObjectIdentifier};
use aws_sdk_s3::Client;
use bytes::Bytes;
use std::path::Path;
use tracing::debug;

/// Object store backed by S3 or an S3-compatible endpoint.
#[derive(Clone)]
pub struct S3ObjectStore {
    client: Client,
}

impl S3ObjectStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client from the ambient AWS environment.
    ///
    /// Honours `AWS_REGION` and, when `S3_ENDPOINT` is set, points the client
    /// at a custom endpoint (e.g., MinIO) with path-style addressing.
    pub async fn from_env() -> Self {
        let region_provider = RegionProviderChain::default_provider().or_else("us-east-1");
        let mut loader = aws_config::defaults(BehaviorVersion::latest()).region(region_provider);
        if let Ok(endpoint) = std::env::var("S3_ENDPOINT") {
            loader = loader.endpoint_url(endpoint);
        }
        let shared = loader.load().await;
        let mut builder = aws_sdk_s3::config::Builder::from(&shared);
        if std::env::var("S3_ENDPOINT").is_ok() {
            builder = builder.force_path_style(true);
        }
        Self {
            client: Client::from_conf(builder.build()),
        }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn list(&self, root: &ObjectLocation) -> StorageResult<Vec<String>> {
        let mut keys = Vec::new();
        let mut pages = self
            .client
            .list_objects_v2()
            .bucket(&root.bucket)
            .prefix(&root.key)
            .into_paginator()
            .send();

        while let Some(page) = pages.next().await {
            let page = page
                .map_err(|e| StorageError::backend("list", &root.bucket, &root.key, e))?;
            keys.extend(
                page.contents()
                    .iter()
                    .filter_map(|object| object.key().map(String::from)),
            );
        }

        debug!(prefix = %root, count = keys.len(), "Listed objects");
        Ok(keys)
    }

    async fn get(&self, location: &ObjectLocation) -> StorageResult<Option<Bytes>> {
        let response = self
            .client
            .get_object()
            .bucket(&location.bucket)
            .key(&location.key)
            .send()
            .await;

        match response {
            Ok(output) => {
                let body = output.body.collect().await.map_err(|e| {
                    StorageError::backend("get", &location.bucket, &location.key, e)
                })?;
                Ok(Some(body.into_bytes()))
            }
            Err(e) => {
                let service_error = e.into_service_error();
                if service_error.is_no_such_key() {
                    Ok(None)
                } else {
                    Err(StorageError::backend(
                        "get",
                        &location.bucket,
                        &location.key,
                        service_error,
                    ))
                }
            }
        }
    }

    async fn put_bytes(
        &self,
        location: &ObjectLocation,
        body: Vec<u8>,
        content_type: &str,
    ) -> StorageResult<()> {
        self.client
            .put_object()
            .bucket(&location.bucket)
            .key(&location.key)
            .content_type(content_type)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| StorageError::backend("put", &location.bucket, &location.key, e))?;

        Ok(())
    }

    async fn put_file(
        &self,
        location: &ObjectLocation,
        path: &Path,
        content_type: &str,
    ) -> StorageResult<()> {
        let body = ByteStream::from_path(path)
            .await
            .map_err(|e| StorageError::backend("put", &location.bucket, &location.key, e))?;

        self.client
            .put_object()
            .bucket(&location.bucket)
            .key(&location.key)
            .content_type(content_type)
            .body(body)
            .send()
            .await
            .map_err(|e| StorageError::backend("put", &location.bucket, &location.key, e))?;

        Ok(())
    }

    async fn copy(&self, bucket: &str, source_key: &str, dest_key: &str) -> StorageResult<bool> {
        let copy_source = format!("{}/{}", bucket, source_key);

        let result = self
            .client
            .copy_object()
            .bucket(bucket)
            .copy_source(copy_source)
            .key(dest_key)
            .send()
            .await;

        match result {
            Ok(_) => Ok(true),
            Err(e) => {
                let service_error = e.into_service_error();
                // A vanished source is reported, not raised; callers decide.
                if service_error.meta().code() == Some("NoSuchKey") {
                    Ok(false)
                } else {
                    Err(StorageError::backend(
                        "copy",
                        bucket,
                        source_key,
                        service_error,
                    ))
                }
            }
        }
    }

    async fn delete(&self, bucket: &str, keys: &[String]) -> StorageResult<()> {
        if keys.is_empty() {
            return Ok(());
        }

        let mut identifiers = Vec::with_capacity(keys.len());
        for key in keys {
            let id = ObjectIdentifier::builder()
                .key(key)
                .build()
                .map_err(|e| StorageError::backend("delete", bucket, key.as_str(), e))?;
            identifiers.push(id);
        }

        let delete = Delete::builder()
            .set_objects(Some(identifiers))
            .build()
            .map_err(|e| StorageError::backend("delete", bucket, "", e))?;

        self.client
            .delete_objects()
            .bucket(bucket)
            .delete(delete)
            .send()
            .await
            .map_err(|e| StorageError::backend("delete", bucket, "", e))?;

        Ok(())
    }
}
