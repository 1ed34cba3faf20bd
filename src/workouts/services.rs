use tracing::{error, info, warn};
use uuid::Uuid;

use crate::error::AppError;
use crate::images::services::store_image;
use crate::state::AppState;
use crate::workouts::{
    dto::AddWorkoutForm,
    repo,
    repo_types::{DeleteOutcome, NewWorkout, Workout},
};

/// Store a full entry from the add-workout form, photo included.
pub async fn create_full(
    state: &AppState,
    user_id: Uuid,
    form: AddWorkoutForm,
) -> Result<Workout, AppError> {
    let fields = form.validate()?;

    let image = match form.image {
        Some(upload) => match store_image(state.storage.as_ref(), upload).await {
            Ok(key) => Some(key),
            Err(e) => {
                warn!(error = %e, %user_id, "photo not stored; saving workout without it");
                None
            }
        },
        None => None,
    };

    let new = NewWorkout::Full {
        date: fields.date,
        workout_type: fields.workout_type,
        duration_minutes: fields.duration_minutes,
        notes: fields.notes,
        image: image.clone(),
    };

    match repo::insert(&state.db, user_id, &new).await {
        Ok(workout) => {
            info!(%user_id, workout_id = %workout.id, "workout added");
            Ok(workout)
        }
        Err(e) => {
            if let Some(key) = image {
                if let Err(cleanup) = state.storage.delete_object(&key).await {
                    error!(error = %cleanup, %key, "orphaned photo left behind");
                }
            }
            Err(e.into())
        }
    }
}

/// Store a template entry dated now.
pub async fn create_from_template(
    state: &AppState,
    user_id: Uuid,
    workout_type: &str,
) -> Result<Workout, AppError> {
    let new = NewWorkout::Template {
        workout_type: workout_type.to_string(),
    };
    let workout = repo::insert(&state.db, user_id, &new).await?;
    info!(%user_id, workout_id = %workout.id, %workout_type, "template workout finished");
    Ok(workout)
}

/// Delete by id and owner. A malformed id deletes nothing.
pub async fn delete(state: &AppState, user_id: Uuid, raw_id: &str) -> Result<DeleteOutcome, AppError> {
    let Ok(workout_id) = Uuid::parse_str(raw_id.trim()) else {
        warn!(%user_id, id = %raw_id, "malformed workout id");
        return Ok(DeleteOutcome::NothingDeleted);
    };

    let outcome = repo::delete_owned(&state.db, user_id, workout_id).await?;
    match &outcome {
        DeleteOutcome::Deleted { image } => {
            info!(%user_id, %workout_id, "workout deleted");
            if let Some(key) = image {
                if let Err(e) = state.storage.delete_object(key).await {
                    warn!(error = %e, %key, "photo removal failed");
                }
            }
        }
        DeleteOutcome::NothingDeleted => {
            warn!(%user_id, %workout_id, "delete matched no owned workout");
        }
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::repo_types::User;
    use crate::images::services::UploadItem;
    use bytes::Bytes;

    fn form_with_image(image: Option<UploadItem>) -> AddWorkoutForm {
        AddWorkoutForm {
            date: "2026-10-19".into(),
            workout_type: "Run".into(),
            duration: "30".into(),
            notes: String::new(),
            image,
        }
    }

    #[tokio::test]
    async fn full_entry_with_photo_then_delete_removes_file() {
        let (state, dir) = AppState::fake().await;
        let user = User::create(&state.db, "anna", "h").await.unwrap();

        let upload = UploadItem {
            body: Bytes::from_static(b"jpeg-bytes"),
            content_type: "image/jpeg".into(),
            file_name: Some("run.jpg".into()),
        };
        let workout = create_full(&state, user.id, form_with_image(Some(upload)))
            .await
            .unwrap();
        let key = workout.image.clone().unwrap();
        assert!(key.ends_with(".jpg"));
        assert_ne!(key, "run.jpg");
        assert!(dir.path().join(&key).exists());

        let outcome = delete(&state, user.id, &workout.id.to_string()).await.unwrap();
        assert_eq!(outcome, DeleteOutcome::Deleted { image: Some(key.clone()) });
        assert!(!dir.path().join(&key).exists());
    }

    #[tokio::test]
    async fn invalid_form_stores_nothing() {
        let (state, _dir) = AppState::fake().await;
        let user = User::create(&state.db, "anna", "h").await.unwrap();
        let mut form = form_with_image(None);
        form.date = "yesterday".into();

        assert!(matches!(
            create_full(&state, user.id, form).await,
            Err(AppError::Validation(_))
        ));
        assert_eq!(repo::count_total(&state.db, user.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn creating_increments_lifetime_count_by_one() {
        let (state, _dir) = AppState::fake().await;
        let user = User::create(&state.db, "anna", "h").await.unwrap();
        let before = repo::count_total(&state.db, user.id).await.unwrap();

        create_full(&state, user.id, form_with_image(None)).await.unwrap();

        assert_eq!(repo::count_total(&state.db, user.id).await.unwrap(), before + 1);
    }

    #[tokio::test]
    async fn malformed_id_deletes_nothing() {
        let (state, _dir) = AppState::fake().await;
        let user = User::create(&state.db, "anna", "h").await.unwrap();
        assert_eq!(
            delete(&state, user.id, "not-a-uuid").await.unwrap(),
            DeleteOutcome::NothingDeleted
        );
    }

    #[tokio::test]
    async fn template_entry_has_no_duration() {
        let (state, _dir) = AppState::fake().await;
        let user = User::create(&state.db, "anna", "h").await.unwrap();
        let w = create_from_template(&state, user.id, "yoga").await.unwrap();
        assert_eq!(w.workout_type, "yoga");
        assert_eq!(w.duration_minutes, None);
    }
}
