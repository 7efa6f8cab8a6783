//! In-memory DesignRepository used by the use case tests.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::gateways::DesignRepository;
use crate::domain::models::design::{CreateDesignData, DesignId, TreatmentDesign};
use crate::domain::models::frame::{Column, Frame};
use crate::domain::models::settings::DesignSettings;
use crate::shared::errors::RepositoryError;

pub(crate) struct MockDesignRepository {
    designs: Mutex<Vec<TreatmentDesign>>,
    failure: Mutex<Option<RepositoryError>>,
    write_failure: Mutex<Option<RepositoryError>>,
}

impl MockDesignRepository {
    pub(crate) fn new() -> Self {
        Self {
            designs: Mutex::new(Vec::new()),
            failure: Mutex::new(None),
            write_failure: Mutex::new(None),
        }
    }

    pub(crate) fn with_design(self, design: TreatmentDesign) -> Self {
        self.designs.lock().unwrap().push(design);
        self
    }

    /// Fail the next call with `error`
    pub(crate) fn with_failure(self, error: RepositoryError) -> Self {
        *self.failure.lock().unwrap() = Some(error);
        self
    }

    /// Fail the next create or update with `error`, letting reads through
    pub(crate) fn with_write_failure(self, error: RepositoryError) -> Self {
        *self.write_failure.lock().unwrap() = Some(error);
        self
    }

    pub(crate) fn stored(&self) -> Vec<TreatmentDesign> {
        self.designs.lock().unwrap().clone()
    }

    fn check(&self) -> Result<(), RepositoryError> {
        match self.failure.lock().unwrap().take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn check_write(&self) -> Result<(), RepositoryError> {
        self.check()?;
        match self.write_failure.lock().unwrap().take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl DesignRepository for MockDesignRepository {
    async fn find_by_id(&self, id: &DesignId) -> Result<Option<TreatmentDesign>, RepositoryError> {
        self.check()?;
        Ok(self.designs.lock().unwrap().iter().find(|d| d.id() == id).cloned())
    }

    async fn find_all_active(&self) -> Result<Vec<TreatmentDesign>, RepositoryError> {
        self.check()?;
        let mut designs: Vec<TreatmentDesign> =
            self.designs.lock().unwrap().iter().filter(|d| d.active()).cloned().collect();
        designs.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(designs)
    }

    async fn create(&self, design: &TreatmentDesign) -> Result<TreatmentDesign, RepositoryError> {
        self.check_write()?;
        self.designs.lock().unwrap().push(design.clone());
        Ok(design.clone())
    }

    async fn update(&self, design: &TreatmentDesign) -> Result<Option<TreatmentDesign>, RepositoryError> {
        self.check_write()?;
        let mut designs = self.designs.lock().unwrap();
        Ok(designs.iter_mut().find(|d| d.id() == design.id()).map(|slot| {
            *slot = design.clone();
            design.clone()
        }))
    }

    async fn soft_delete(&self, id: &DesignId) -> Result<bool, RepositoryError> {
        self.check()?;
        let mut designs = self.designs.lock().unwrap();
        match designs.iter().position(|d| d.id() == id && d.active()) {
            Some(index) => {
                let design = designs.remove(index).deactivate();
                designs.insert(index, design);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn exists_by_name(&self, name: &str, exclude_id: Option<&DesignId>) -> Result<bool, RepositoryError> {
        self.check()?;
        Ok(self
            .designs
            .lock()
            .unwrap()
            .iter()
            .any(|d| d.active() && d.name() == name && Some(d.id()) != exclude_id))
    }
}

/// Small training frame: id `k`, numeric `x`, categorical `color`, target `y`
pub(crate) fn training_frame() -> Frame {
    Frame::new(vec![
        Column::int("k", vec![Some(1), Some(2), Some(3), Some(4)]),
        Column::float("x", vec![Some(0.5), None, Some(1.5), Some(2.5)]),
        Column::text(
            "color",
            vec![Some("red".into()), Some("blue".into()), Some("red".into()), Some("blue".into())],
        ),
        Column::int("y", vec![Some(1), Some(0), Some(0), Some(1)]),
    ])
    .unwrap()
}

pub(crate) fn design_data(name: &str) -> CreateDesignData {
    CreateDesignData {
        name: name.to_string(),
        description: Some("test design".to_string()),
        settings: DesignSettings {
            id_features: vec!["k".to_string()],
            target: Some("y".to_string()),
            ..Default::default()
        },
    }
}

pub(crate) fn fitted_design(name: &str) -> TreatmentDesign {
    TreatmentDesign::fit(design_data(name), &training_frame()).unwrap()
}
