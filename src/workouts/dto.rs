use axum::extract::Multipart;
use serde::{Deserialize, Serialize};
use time::{macros::format_description, Date};
use tracing::warn;

use crate::error::AppError;
use crate::images::services::UploadItem;

/// Fields of the "add workout" multipart form, as received.
#[derive(Debug, Default)]
pub struct AddWorkoutForm {
    pub date: String,
    pub workout_type: String,
    pub duration: String,
    pub notes: String,
    pub image: Option<UploadItem>,
}

/// Validated text fields of a full entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FullEntryFields {
    pub date: Date,
    pub workout_type: String,
    pub duration_minutes: Option<i64>,
    pub notes: Option<String>,
}

impl AddWorkoutForm {
    /// Drain the multipart body. A broken or empty file part counts as no image.
    pub async fn from_multipart(mut mp: Multipart) -> Self {
        let mut form = AddWorkoutForm::default();
        while let Ok(Some(field)) = mp.next_field().await {
            let name = field.name().unwrap_or_default().to_string();
            if name == "image" {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field
                    .content_type()
                    .map(str::to_string)
                    .unwrap_or_else(|| "application/octet-stream".into());
                match field.bytes().await {
                    Ok(body) if !body.is_empty() => {
                        form.image = Some(UploadItem {
                            body,
                            content_type,
                            file_name,
                        })
                    }
                    Ok(_) => {}
                    Err(e) => warn!(error = %e, "image part unreadable; ignoring"),
                }
                continue;
            }

            let value = match field.text().await {
                Ok(v) => v,
                Err(e) => {
                    warn!(error = %e, field = %name, "form field unreadable");
                    continue;
                }
            };
            match name.as_str() {
                "date" => form.date = value,
                "workout_type" => form.workout_type = value,
                "duration" => form.duration = value,
                "notes" => form.notes = value,
                _ => {}
            }
        }
        form
    }

    pub fn validate(&self) -> Result<FullEntryFields, AppError> {
        let date = parse_date(self.date.trim())
            .ok_or_else(|| AppError::Validation("Please pick a valid date.".into()))?;

        let workout_type = self.workout_type.trim();
        if workout_type.is_empty() {
            return Err(AppError::Validation("Workout type must not be empty.".into()));
        }

        let duration = self.duration.trim();
        let duration_minutes = if duration.is_empty() {
            None
        } else {
            match duration.parse::<i64>() {
                Ok(m) if m >= 0 => Some(m),
                _ => {
                    return Err(AppError::Validation(
                        "Duration must be a whole number of minutes.".into(),
                    ))
                }
            }
        };

        let notes = self.notes.trim();
        Ok(FullEntryFields {
            date,
            workout_type: workout_type.to_string(),
            duration_minutes,
            notes: (!notes.is_empty()).then(|| notes.to_string()),
        })
    }
}

fn parse_date(raw: &str) -> Option<Date> {
    Date::parse(raw, format_description!("[year]-[month]-[day]")).ok()
}

#[derive(Debug, Deserialize)]
pub struct DeleteParams {
    pub id: Option<String>,
}

/// One row of the recent-workouts table.
#[derive(Debug, Serialize)]
pub struct WorkoutListItem {
    pub id: String,
    pub date: String,
    pub workout_type: String,
    pub duration_minutes: Option<i64>,
    pub notes: String,
    pub image_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn form(date: &str, kind: &str, duration: &str, notes: &str) -> AddWorkoutForm {
        AddWorkoutForm {
            date: date.into(),
            workout_type: kind.into(),
            duration: duration.into(),
            notes: notes.into(),
            image: None,
        }
    }

    #[test]
    fn valid_form() {
        let fields = form("2026-10-19", " Run ", "45", " felt good ").validate().unwrap();
        assert_eq!(
            fields,
            FullEntryFields {
                date: date!(2026 - 10 - 19),
                workout_type: "Run".into(),
                duration_minutes: Some(45),
                notes: Some("felt good".into()),
            }
        );
    }

    #[test]
    fn optional_fields_may_be_blank() {
        let fields = form("2026-10-19", "Run", "", "  ").validate().unwrap();
        assert_eq!(fields.duration_minutes, None);
        assert_eq!(fields.notes, None);
    }

    #[test]
    fn rejects_bad_input() {
        for f in [
            form("19.10.2026", "Run", "10", ""),
            form("", "Run", "10", ""),
            form("2026-10-19", "  ", "10", ""),
            form("2026-10-19", "Run", "ten", ""),
            form("2026-10-19", "Run", "-5", ""),
        ] {
            assert!(matches!(f.validate(), Err(AppError::Validation(_))), "{f:?}");
        }
    }
}
