//! Scaffold Service - main application orchestrator.
//!
//! This service coordinates the `create` workflow:
//! 1. Check the target location
//! 2. Acquire the template
//! 3. Materialize it under the module name
//!
//! It implements the driving port (incoming) and uses driven ports (outgoing).

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, instrument};

use crate::{
    application::{
        ApplicationError,
        ports::{Filesystem, TemplateOrigin, TemplateSource},
        services::materializer::{MaterializeJob, MaterializeReport, Materializer},
    },
    domain::{AuthorIdentity, ModuleName},
    error::PodsmithResult,
};

/// A request to create a new library project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRequest {
    pub module: ModuleName,
    pub output_dir: PathBuf,
    pub include_example: bool,
    /// Bypass the cached template.
    pub refresh_template: bool,
}

impl CreateRequest {
    pub fn new(module: ModuleName, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            module,
            output_dir: output_dir.into(),
            include_example: true,
            refresh_template: false,
        }
    }

    pub fn include_example(mut self, include: bool) -> Self {
        self.include_example = include;
        self
    }

    pub fn refresh_template(mut self, refresh: bool) -> Self {
        self.refresh_template = refresh;
        self
    }

    pub fn target(&self) -> PathBuf {
        Materializer::target(&self.output_dir, &self.module)
    }
}

/// Outcome of a successful `create`. Serializes as one flat JSON object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateReport {
    pub module: ModuleName,
    pub origin: TemplateOrigin,
    #[serde(flatten)]
    pub materialized: MaterializeReport,
}

impl CreateReport {
    pub fn project_dir(&self) -> &Path {
        &self.materialized.project_dir
    }
}

/// Main scaffolding service.
pub struct ScaffoldService {
    source: Box<dyn TemplateSource>,
    filesystem: Box<dyn Filesystem>,
}

impl ScaffoldService {
    /// Create a new scaffold service with the given adapters.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use podsmith_core::application::ScaffoldService;
    ///
    /// let service = ScaffoldService::new(
    ///     source,     // impl TemplateSource
    ///     filesystem, // impl Filesystem
    /// );
    /// ```
    pub fn new(source: Box<dyn TemplateSource>, filesystem: Box<dyn Filesystem>) -> Self {
        Self { source, filesystem }
    }

    /// Create a new project from the template.
    #[instrument(
        skip_all,
        fields(
            module = %request.module,
            output_dir = %request.output_dir.display(),
            include_example = request.include_example
        )
    )]
    pub fn create(
        &self,
        request: &CreateRequest,
        identity: &AuthorIdentity,
    ) -> PodsmithResult<CreateReport> {
        self.check_target(request)?;

        let template = self.source.acquire(request.refresh_template)?;
        info!(
            origin = %template.origin,
            payload = %template.payload_dir.display(),
            "Template ready"
        );

        let job = MaterializeJob {
            payload_dir: &template.payload_dir,
            token: &template.token,
            module: &request.module,
            output_dir: &request.output_dir,
            include_example: request.include_example,
            identity,
        };
        let materialized = Materializer::new(self.filesystem.as_ref()).materialize(&job)?;

        Ok(CreateReport {
            module: request.module.clone(),
            origin: template.origin,
            materialized,
        })
    }

    /// Validate a request without acquiring or writing anything.
    ///
    /// Returns the path the project would be created at.
    pub fn dry_run(&self, request: &CreateRequest) -> PodsmithResult<PathBuf> {
        self.check_target(request)?;
        Ok(request.target())
    }

    fn check_target(&self, request: &CreateRequest) -> PodsmithResult<()> {
        let target = request.target();
        if self.filesystem.exists(&target) {
            return Err(ApplicationError::ProjectExists { path: target }.into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{MockFilesystem, MockTemplateSource};

    fn request() -> CreateRequest {
        CreateRequest::new(ModuleName::parse("MyLib").unwrap(), "/work")
    }

    #[test]
    fn existing_target_fails_before_acquiring_template() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().return_const(true);
        let mut source = MockTemplateSource::new();
        source.expect_acquire().never();

        let service = ScaffoldService::new(Box::new(source), Box::new(fs));
        let err = service
            .create(&request(), &AuthorIdentity::default())
            .unwrap_err();
        assert!(err.to_string().contains("/work/MyLib"));
    }

    #[test]
    fn acquisition_failure_is_reported() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().return_const(false);
        let mut source = MockTemplateSource::new();
        source
            .expect_acquire()
            .withf(|refresh| *refresh)
            .returning(|_| {
                Err(ApplicationError::TemplateUnavailable {
                    reason: "clone failed".into(),
                }
                .into())
            });

        let service = ScaffoldService::new(Box::new(source), Box::new(fs));
        let req = request().refresh_template(true);
        assert!(service.create(&req, &AuthorIdentity::default()).is_err());
    }

    #[test]
    fn dry_run_reports_target() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().return_const(false);
        let service = ScaffoldService::new(Box::new(MockTemplateSource::new()), Box::new(fs));
        assert_eq!(
            service.dry_run(&request()).unwrap(),
            PathBuf::from("/work/MyLib")
        );
    }

    #[test]
    fn report_serializes_flat() {
        let report = CreateReport {
            module: ModuleName::parse("MyLib").unwrap(),
            origin: TemplateOrigin::LocalDev,
            materialized: MaterializeReport {
                project_dir: PathBuf::from("/work/MyLib"),
                substituted: vec![PathBuf::from("MyLib.podspec")],
                example_removed: true,
                ..MaterializeReport::default()
            },
        };

        let value = serde_json::to_value(&report).unwrap();

        assert_eq!(value["module"], "MyLib");
        assert_eq!(value["origin"], "local_dev");
        assert_eq!(value["project_dir"], "/work/MyLib");
        assert_eq!(value["substituted"], serde_json::json!(["MyLib.podspec"]));
        assert_eq!(value["example_removed"], true);
        assert!(value.get("materialized").is_none());
    }
}
