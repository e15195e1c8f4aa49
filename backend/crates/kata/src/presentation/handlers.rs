//! HTTP Handlers

use axum::Json;
use axum::body::Body;
use axum::extract::multipart::{Field, MultipartError};
use axum::extract::{Multipart, Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use kernel::error::app_error::AppError;
use kernel::id::{KataId, UserId};
use kernel::query::{PageRequest, Sort, parse_order};
use platform::storage::ObjectStorage;
use platform::upload::{UploadError, UploadPolicy};
use platform::values::parse_number;
use std::sync::Arc;

use auth::{AuthenticatedUser, UserRepository};

use crate::application::config::KataConfig;
use crate::application::{
    CreateKataInput, CreateKataUseCase, DeleteKataUseCase, DownloadFileUseCase, GetKataUseCase,
    JoinKataUseCase, ListKatasUseCase, RateKataUseCase, UpdateKataInput, UpdateKataUseCase,
    UploadFilesUseCase, UploadedFile, UserKatasUseCase,
};
use crate::domain::repository::{KataFilter, KataRepository, KataSortField};
use crate::domain::value_object::kata_level::KataLevel;
use crate::error::{KataError, KataResult};
use crate::presentation::dto::{
    CreateKataRequest, FileQuery, FilesResponse, KataCreatedResponse, KataIdQuery, KataResponse,
    KatasPageResponse, KatasQuery, MessageResponse, ParticipantsResponse, RateKataRequest,
    StarsResponse, UpdateKataRequest, UserKatasResponse,
};

/// Shared state for kata handlers
#[derive(Clone)]
pub struct KataAppState<K, U>
where
    K: KataRepository + Clone + Send + Sync + 'static,
    U: UserRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<K>,
    pub users: Arc<U>,
    pub storage: ObjectStorage,
    pub config: Arc<KataConfig>,
}

fn parse_kata_id(raw: &str) -> KataResult<KataId> {
    raw.parse::<KataId>()
        .map_err(|e| KataError::App(AppError::from(e)))
}

fn require_id(id: Option<String>, message: &str) -> KataResult<KataId> {
    let id = id.ok_or_else(|| KataError::Validation(message.to_string()))?;
    parse_kata_id(&id)
}

/// `page`, `limit`, `order` and `level` shared by every kata listing
fn list_params(
    query: &KatasQuery,
    config: &KataConfig,
) -> KataResult<(KataFilter, PageRequest, Vec<Sort<KataSortField>>)> {
    let max = config.max_page_size;
    let page = PageRequest::new(
        parse_number(query.page.as_deref(), 1, u32::MAX as u64),
        parse_number(query.limit.as_deref(), 1, max),
        max,
    );
    let sorts = parse_order::<KataSortField>(query.order.as_deref())?;
    let level = query
        .level
        .as_deref()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(KataLevel::parse_filter)
        .transpose()?;

    Ok((
        KataFilter {
            level,
            creator: None,
        },
        page,
        sorts,
    ))
}

// ============================================================================
// Katas
// ============================================================================

/// GET /api/katas
///
/// With `id` returns one kata, otherwise a page.
pub async fn get_katas<K, U>(
    State(state): State<KataAppState<K, U>>,
    Query(query): Query<KatasQuery>,
) -> KataResult<Response>
where
    K: KataRepository + Clone + Send + Sync + 'static,
    U: UserRepository + Clone + Send + Sync + 'static,
{
    if let Some(id) = query.id.as_deref() {
        let kata_id = parse_kata_id(id)?;
        let kata = GetKataUseCase::new(state.repo.clone())
            .execute(&kata_id)
            .await?;
        return Ok(Json(KataResponse::from(kata)).into_response());
    }

    let (filter, page, sorts) = list_params(&query, &state.config)?;
    let katas = ListKatasUseCase::new(state.repo.clone())
        .execute(filter, page, &sorts)
        .await?;

    Ok(Json(KatasPageResponse::from(katas)).into_response())
}

/// POST /api/katas
pub async fn create_kata<K, U>(
    State(state): State<KataAppState<K, U>>,
    caller: AuthenticatedUser,
    Json(req): Json<CreateKataRequest>,
) -> KataResult<(StatusCode, Json<KataCreatedResponse>)>
where
    K: KataRepository + Clone + Send + Sync + 'static,
    U: UserRepository + Clone + Send + Sync + 'static,
{
    let name = req.name.ok_or_else(|| {
        KataError::Validation("Please, provide a Kata Entity to create one".into())
    })?;

    let kata = CreateKataUseCase::new(state.repo.clone())
        .execute(
            &caller,
            CreateKataInput {
                name,
                description: req.description,
                level: req.level,
                intents: req.intents,
                solution: req.solution,
                participants: req.participants.unwrap_or_default(),
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(KataCreatedResponse {
            message: format!("Kata created successfully: {}", kata.name),
            id: kata.kata_id,
        }),
    ))
}

/// PUT /api/katas?id
pub async fn update_kata<K, U>(
    State(state): State<KataAppState<K, U>>,
    caller: AuthenticatedUser,
    Query(query): Query<KataIdQuery>,
    Json(req): Json<UpdateKataRequest>,
) -> KataResult<Json<MessageResponse>>
where
    K: KataRepository + Clone + Send + Sync + 'static,
    U: UserRepository + Clone + Send + Sync + 'static,
{
    let kata_id = require_id(query.id, "Please, provide an ID to update an existing kata")?;

    let (Some(name), Some(description), Some(level), Some(intents), Some(solution)) =
        (req.name, req.description, req.level, req.intents, req.solution)
    else {
        return Err(KataError::Validation(
            "You need to send all attributes of Kata to update it".into(),
        ));
    };

    UpdateKataUseCase::new(state.repo.clone())
        .execute(
            &caller,
            UpdateKataInput {
                kata_id,
                name,
                description,
                level,
                intents,
                solution,
            },
        )
        .await?;

    Ok(Json(MessageResponse::new(format!(
        "Kata with id {} updated successfully",
        kata_id
    ))))
}

/// DELETE /api/katas?id
pub async fn delete_kata<K, U>(
    State(state): State<KataAppState<K, U>>,
    caller: AuthenticatedUser,
    Query(query): Query<KataIdQuery>,
) -> KataResult<Json<MessageResponse>>
where
    K: KataRepository + Clone + Send + Sync + 'static,
    U: UserRepository + Clone + Send + Sync + 'static,
{
    let kata_id = require_id(query.id, "Please, provide an ID to remove from database")?;

    DeleteKataUseCase::new(state.repo.clone(), state.storage.clone())
        .execute(&caller, &kata_id)
        .await?;

    Ok(Json(MessageResponse::new(format!(
        "Kata with id {} deleted successfully",
        kata_id
    ))))
}

// ============================================================================
// Stars / Participants
// ============================================================================

/// PUT /api/katas/stars?id
pub async fn rate_kata<K, U>(
    State(state): State<KataAppState<K, U>>,
    caller: AuthenticatedUser,
    Query(query): Query<KataIdQuery>,
    Json(req): Json<RateKataRequest>,
) -> KataResult<Json<StarsResponse>>
where
    K: KataRepository + Clone + Send + Sync + 'static,
    U: UserRepository + Clone + Send + Sync + 'static,
{
    let kata_id = require_id(query.id, "Please, provide an ID to rate a kata")?;
    let stars = req
        .stars
        .ok_or_else(|| KataError::Validation("Please, provide a number of stars".into()))?;

    let average = RateKataUseCase::new(state.repo.clone())
        .execute(&caller, &kata_id, stars)
        .await?;

    Ok(Json(StarsResponse {
        message: format!("Kata with id {} rated successfully", kata_id),
        average,
    }))
}

/// PUT /api/katas/participants?id
pub async fn join_kata<K, U>(
    State(state): State<KataAppState<K, U>>,
    caller: AuthenticatedUser,
    Query(query): Query<KataIdQuery>,
) -> KataResult<Json<ParticipantsResponse>>
where
    K: KataRepository + Clone + Send + Sync + 'static,
    U: UserRepository + Clone + Send + Sync + 'static,
{
    let kata_id = require_id(query.id, "Please, provide an ID to join a kata")?;

    let participants = JoinKataUseCase::new(state.repo.clone())
        .execute(&caller, &kata_id)
        .await?;

    Ok(Json(ParticipantsResponse {
        message: format!("Joined kata with id {}", kata_id),
        participants,
    }))
}

// ============================================================================
// Files
// ============================================================================

fn multipart_error(err: MultipartError, policy: &UploadPolicy) -> KataError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return UploadError::TooLarge {
            max: policy.max_file_size,
        }
        .into();
    }
    KataError::Validation(format!("Invalid multipart body: {}", err.body_text()))
}

/// Read one file part, failing as soon as it exceeds the size limit
async fn read_file(mut field: Field<'_>, policy: &UploadPolicy) -> KataResult<UploadedFile> {
    let original_name = field.file_name().unwrap_or("file").to_string();
    let content_type = field
        .content_type()
        .unwrap_or("application/octet-stream")
        .to_string();
    policy.check_mime(&content_type)?;

    let mut data = Vec::new();
    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| multipart_error(e, policy))?
    {
        policy.check_size(data.len() + chunk.len())?;
        data.extend_from_slice(&chunk);
    }

    Ok(UploadedFile {
        original_name,
        content_type,
        data: data.into(),
    })
}

/// POST /api/katas/files?id
pub async fn upload_files<K, U>(
    State(state): State<KataAppState<K, U>>,
    caller: AuthenticatedUser,
    Query(query): Query<KataIdQuery>,
    mut multipart: Multipart,
) -> KataResult<(StatusCode, Json<FilesResponse>)>
where
    K: KataRepository + Clone + Send + Sync + 'static,
    U: UserRepository + Clone + Send + Sync + 'static,
{
    let kata_id = require_id(query.id, "Please, provide an ID to upload files")?;
    let policy = &state.config.upload;

    let mut seen_field = false;
    let mut files = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, policy))?
    {
        let name = field.name().unwrap_or_default().to_string();
        let Some(file_name) = field.file_name() else {
            // Text parts ride along with the files; an empty file input may arrive as one
            seen_field |= name == policy.field_name;
            continue;
        };
        policy.check_field(&name)?;
        seen_field = true;

        if file_name.is_empty() {
            continue;
        }
        policy.check_count(files.len() + 1)?;
        files.push(read_file(field, policy).await?);
    }

    if !seen_field {
        return Err(UploadError::MissingField(policy.field_name.clone()).into());
    }

    let stored = UploadFilesUseCase::new(state.repo.clone(), state.storage.clone(), state.config.clone())
        .execute(&caller, &kata_id, files)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(FilesResponse {
            message: format!("{} file(s) uploaded to kata with id {}", stored.len(), kata_id),
            files: stored,
        }),
    ))
}

/// GET /api/katas/files?id&filename
pub async fn download_file<K, U>(
    State(state): State<KataAppState<K, U>>,
    Query(query): Query<FileQuery>,
) -> KataResult<Response>
where
    K: KataRepository + Clone + Send + Sync + 'static,
    U: UserRepository + Clone + Send + Sync + 'static,
{
    let kata_id = require_id(query.id, "Please, provide an ID to download a file")?;
    let filename = query
        .filename
        .filter(|f| !f.is_empty())
        .ok_or_else(|| KataError::Validation("Please, provide a filename".into()))?;

    let data = DownloadFileUseCase::new(state.repo.clone(), state.storage.clone())
        .execute(&kata_id, &filename)
        .await?;

    // Stored names are sanitized, so they are safe inside the quoted header
    let disposition = format!("attachment; filename=\"{}\"", filename);
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/octet-stream")
        .header(header::CONTENT_DISPOSITION, disposition)
        .header(header::CONTENT_LENGTH, data.len())
        .body(Body::from(data))
        .map_err(|e| KataError::Internal(format!("Failed to build download response: {}", e)))
}

// ============================================================================
// User katas
// ============================================================================

/// GET /api/users/katas?id
pub async fn user_katas<K, U>(
    State(state): State<KataAppState<K, U>>,
    Query(query): Query<KatasQuery>,
) -> KataResult<Json<UserKatasResponse>>
where
    K: KataRepository + Clone + Send + Sync + 'static,
    U: UserRepository + Clone + Send + Sync + 'static,
{
    let id = query
        .id
        .as_deref()
        .ok_or_else(|| KataError::Validation("ID from user is needed".into()))?;
    let user_id = id
        .parse::<UserId>()
        .map_err(|e| KataError::App(AppError::from(e)))?;

    let (filter, page, sorts) = list_params(&query, &state.config)?;
    let result = UserKatasUseCase::new(state.repo.clone(), state.users.clone())
        .execute(&user_id, filter, page, &sorts)
        .await?;

    let katas = result.katas.map(KataResponse::from);
    Ok(Json(UserKatasResponse {
        user: result.email,
        katas: katas.items,
        total_pages: katas.total_pages,
        current_page: katas.current_page,
    }))
}
