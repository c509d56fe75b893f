//! CV lifecycle: creation, data saves and deletion.
//!
//! Each operation performs its primary write first and then runs the derived
//! work (naming, templating, language sync, rendering, scoring). Derived work
//! is best-effort: failures are logged and the primary write stands.

use std::sync::Arc;

use tracing::{info, warn};
use validator::Validate;

use super::language::{detect_cv_language, LanguageDetector};
use super::naming::{base_cv_name, derive_cv_name, UNTITLED};
use super::template_defaults::{default_template, DEFAULT_ABSTRACT_TEMPLATE};
use crate::errors::AppError;
use crate::models::cv::{CvDataInput, CvDataRow, CvRow, NewCv, TEMPLATE_LANGUAGES};
use crate::models::DbId;
use crate::render::{CvRenderer, RenderRequest};
use crate::similarity::{score_tailored_cv, SimilarityScorer};
use crate::store::Store;

/// Collaborators the lifecycle needs.
#[derive(Clone)]
pub struct CvServices {
    pub store: Arc<dyn Store>,
    pub detector: Arc<dyn LanguageDetector>,
    pub renderer: Arc<dyn CvRenderer>,
    /// `None` when no AI key is configured.
    pub scorer: Option<Arc<dyn SimilarityScorer>>,
}

/// Inserts a CV, then names and templates it when the caller did not.
pub async fn create_cv(svc: &CvServices, new: &NewCv) -> Result<CvRow, AppError> {
    let inserted = svc.store.insert_cv(new).await?;
    let mut cv = inserted.cv;
    if !inserted.replaced_cv_ids.is_empty() {
        info!(
            cv_id = cv.id,
            candidate_id = cv.candidate_id,
            replaced = ?inserted.replaced_cv_ids,
            "New base CV replaced previous base CVs"
        );
    }

    if cv.name.as_deref().map_or(true, str::is_empty) {
        let name = match derive_cv_name(svc.store.as_ref(), svc.detector.as_ref(), &cv).await {
            Ok(name) => name,
            Err(e) => {
                warn!(cv_id = cv.id, "Error setting CV name: {e}");
                UNTITLED.to_string()
            }
        };
        svc.store.set_cv_name(cv.id, &name).await?;
        cv.name = Some(name);
    }

    if cv.template_id.is_none() {
        if let Some(template_id) = attach_default_template(svc, &cv).await? {
            cv.template_id = Some(template_id);
        }
    }

    Ok(cv)
}

/// Creates the default template from the `sydney` design, if that design exists.
async fn attach_default_template(svc: &CvServices, cv: &CvRow) -> Result<Option<DbId>, AppError> {
    let Some(abstract_template) = svc
        .store
        .find_abstract_template_by_name(DEFAULT_ABSTRACT_TEMPLATE)
        .await?
    else {
        return Ok(None);
    };

    let template = svc
        .store
        .insert_template(&default_template(abstract_template.id))
        .await?;
    svc.store.set_cv_template(cv.id, template.id).await?;
    Ok(Some(template.id))
}

/// Deletes a CV together with the template it owns.
/// Returns `false` when the CV does not exist.
pub async fn delete_cv(svc: &CvServices, cv_id: DbId) -> Result<bool, AppError> {
    let Some(cv) = svc.store.delete_cv_with_template(cv_id).await? else {
        return Ok(false);
    };
    info!(cv_id, template_id = ?cv.template_id, "CV deleted");
    Ok(true)
}

/// Creates or replaces a CV's data and runs the derived updates.
pub async fn save_cv_data(
    svc: &CvServices,
    cv_id: DbId,
    input: &CvDataInput,
) -> Result<CvDataRow, AppError> {
    input.validate()?;

    let mut cv = svc
        .store
        .get_cv(cv_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("CV {cv_id} not found")))?;

    let before = svc.store.get_cv_data(cv_id).await?;
    let mut data = match &before {
        Some(_) => svc.store.update_cv_data(cv_id, input).await?,
        None => svc.store.insert_cv_data(cv_id, input).await?,
    };

    if let Err(e) = refresh_base_cv_name(svc, &mut cv, &mut data).await {
        warn!(cv_id, "Error updating CV name after CV data save: {e}");
    }

    if data.name.as_deref().is_some_and(|n| !n.is_empty()) {
        if let Some(template_id) = cv.template_id {
            refresh_artifacts(svc, &cv, &data, template_id).await;
        }
    }

    if let Some(before) = &before {
        score_tailored_cv(
            svc.store.as_ref(),
            svc.scorer.as_deref(),
            &cv,
            before,
            &data,
        )
        .await;
    }

    Ok(data)
}

/// Replaces a placeholder base CV name with one built from the headline.
async fn refresh_base_cv_name(
    svc: &CvServices,
    cv: &mut CvRow,
    data: &mut CvDataRow,
) -> Result<(), AppError> {
    if !cv.is_base() || !cv.has_placeholder_name() {
        return Ok(());
    }

    let title = data
        .headline
        .clone()
        .filter(|h| !h.is_empty())
        .unwrap_or_else(|| UNTITLED.to_string());

    if data.title.as_deref().map_or(true, str::is_empty) {
        svc.store.set_cv_data_title(cv.id, &title).await?;
        data.title = Some(title.clone());
    }

    let name = base_cv_name(Some(&title));
    svc.store.set_cv_name(cv.id, &name).await?;
    cv.name = Some(name);
    Ok(())
}

/// Syncs the template language with the content, then regenerates the PDF.
async fn refresh_artifacts(svc: &CvServices, cv: &CvRow, data: &CvDataRow, template_id: DbId) {
    let detected = detect_cv_language(svc.detector.as_ref(), data.work.as_ref());
    let language = detected
        .as_deref()
        .filter(|lang| TEMPLATE_LANGUAGES.contains(lang));

    if let Err(e) = svc.store.set_template_language(template_id, language).await {
        warn!(cv_id = cv.id, template_id, "Failed to sync template language: {e}");
        return;
    }

    let template = match svc.store.get_template(template_id).await {
        Ok(Some(template)) => template,
        Ok(None) => return,
        Err(e) => {
            warn!(cv_id = cv.id, template_id, "Failed to load template for rendering: {e}");
            return;
        }
    };

    let request = RenderRequest {
        cv,
        cv_data: data,
        template: &template,
    };
    match svc.renderer.render(&request).await {
        Ok(Some(rendered)) => {
            if let Err(e) = svc
                .store
                .set_cv_artifacts(cv.id, &rendered.pdf_path, rendered.thumbnail_path.as_deref())
                .await
            {
                warn!(cv_id = cv.id, "Failed to store rendered artifacts: {e}");
            }
        }
        Ok(None) => {}
        Err(e) => warn!(cv_id = cv.id, "PDF regeneration failed: {e}"),
    }
}
