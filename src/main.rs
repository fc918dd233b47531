#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use roster_tauri::admin::AdminView;
use roster_tauri::app::{AppState, LoginForm, Theme};
use roster_tauri::auth::Session;
use roster_tauri::config::AppConfig;
use roster_tauri::errors::{ConfigError, FlowError};
use roster_tauri::export::{CsvExport, ExportOutcome};
use roster_tauri::filter::FilterState;
use roster_tauri::home::HomeView;
use roster_tauri::hr::HrView;
use roster_tauri::logging;
use roster_tauri::model::{AccessKeyDraft, CandidateDraft};
use roster_tauri::notice::Notice;
use roster_tauri::storage::{sanitize_filename, write_text_file, StoragePaths};
use serde::{Deserialize, Serialize};
use tauri::{AppHandle, Manager, State};
use tauri_plugin_clipboard_manager::ClipboardExt;
use tauri_plugin_opener::OpenerExt;

const STORAGE_DIR: &str = "RosterDesk";

type Shared<'a> = State<'a, Mutex<AppState>>;
type SessionResult = Result<ScreenResult<Option<Session>>, String>;

#[derive(Deserialize)]
struct KeyRequest {
    key: String,
}

#[derive(Deserialize)]
struct IdRequest {
    id: String,
}

#[derive(Deserialize)]
struct HomeBookmarkRequest {
    id: String,
    bookmarked: bool,
}

#[derive(Deserialize)]
struct UpdateStudentRequest {
    id: String,
    draft: CandidateDraft,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct KeyActiveRequest {
    id: String,
    is_active: bool,
}

#[derive(Deserialize)]
struct AccountDisabledRequest {
    email: String,
    disabled: bool,
}

#[derive(Deserialize)]
struct ClipboardWriteRequest {
    text: String,
}

#[derive(Deserialize)]
struct OpenExternalRequest {
    url: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ScreenResult<T> {
    notice: Option<Notice>,
    view: T,
}

#[derive(Serialize)]
struct SaveCsvResult {
    ok: bool,
    canceled: bool,
    filename: String,
    path: Option<String>,
    notice: Notice,
}

fn lock<'a>(state: &'a Shared<'_>) -> Result<MutexGuard<'a, AppState>, String> {
    state.lock().map_err(|_| "app state is unavailable".to_string())
}

/// Flow failures are shown to the user, not returned as command errors.
fn settle(result: Result<Notice, FlowError>) -> Notice {
    result.unwrap_or_else(|err| {
        tracing::debug!(error = %err, "operation reported to user");
        err.notice()
    })
}

fn storage_root_dir(app: &AppHandle) -> Result<PathBuf, ConfigError> {
    let base = app
        .path()
        .app_data_dir()
        .map_err(|_| ConfigError::NoStorageRoot)?;
    Ok(base.join(STORAGE_DIR))
}

/// Asks for a destination and writes the export there. A dismissed dialog is
/// not an error.
fn save_export(outcome: ExportOutcome) -> Result<SaveCsvResult, String> {
    let notice = outcome.notice().clone();
    let Some(CsvExport {
        filename, content, ..
    }) = outcome.export().cloned()
    else {
        return Ok(SaveCsvResult {
            ok: false,
            canceled: false,
            filename: String::new(),
            path: None,
            notice,
        });
    };

    let default_name = sanitize_filename(filename.as_str());
    let path = rfd::FileDialog::new()
        .add_filter("CSV", &["csv"])
        .set_file_name(default_name.as_str())
        .save_file();
    let Some(path) = path else {
        return Ok(SaveCsvResult {
            ok: false,
            canceled: true,
            filename: default_name,
            path: None,
            notice,
        });
    };

    write_text_file(path.as_path(), content.as_str()).map_err(|err| err.to_string())?;
    tracing::info!(path = %path.display(), "export written");
    Ok(SaveCsvResult {
        ok: true,
        canceled: false,
        filename: default_name,
        path: Some(path.to_string_lossy().to_string()),
        notice,
    })
}

#[tauri::command]
fn app_version(app: AppHandle) -> String {
    app.package_info().version.to_string()
}

#[tauri::command]
fn platform_name() -> String {
    match std::env::consts::OS {
        "windows" => "win32",
        "macos" => "darwin",
        _ => "linux",
    }
    .to_string()
}

#[tauri::command]
fn theme_get(state: Shared<'_>) -> Result<Theme, String> {
    Ok(lock(&state)?.theme())
}

#[tauri::command]
fn theme_toggle(state: Shared<'_>) -> Result<Theme, String> {
    Ok(lock(&state)?.toggle_theme())
}

#[tauri::command]
fn session_get(state: Shared<'_>) -> Result<Option<Session>, String> {
    Ok(lock(&state)?.session().cloned())
}

#[tauri::command]
fn auth_sign_in(state: Shared<'_>, payload: LoginForm) -> SessionResult {
    let mut app = lock(&state)?;
    let notice = settle(app.sign_in(&payload));
    Ok(ScreenResult {
        notice: Some(notice),
        view: app.session().cloned(),
    })
}

#[tauri::command]
fn auth_sign_up(state: Shared<'_>, payload: LoginForm) -> SessionResult {
    let mut app = lock(&state)?;
    let notice = settle(app.sign_up(&payload));
    Ok(ScreenResult {
        notice: Some(notice),
        view: app.session().cloned(),
    })
}

#[tauri::command]
fn auth_sign_out(state: Shared<'_>) -> Result<Notice, String> {
    Ok(lock(&state)?.sign_out())
}

#[tauri::command]
fn home_view(state: Shared<'_>) -> Result<HomeView, String> {
    Ok(lock(&state)?.home.view())
}

#[tauri::command]
fn home_submit_key(
    state: Shared<'_>,
    payload: KeyRequest,
) -> Result<ScreenResult<HomeView>, String> {
    let mut guard = lock(&state)?;
    let app = &mut *guard;
    let notice = settle(app.home.submit_key(payload.key.as_str(), &app.store));
    Ok(ScreenResult {
        notice: Some(notice),
        view: app.home.view(),
    })
}

#[tauri::command]
fn home_reset(state: Shared<'_>) -> Result<HomeView, String> {
    let mut app = lock(&state)?;
    app.home.reset();
    Ok(app.home.view())
}

#[tauri::command]
fn home_set_filter(state: Shared<'_>, payload: FilterState) -> Result<HomeView, String> {
    let mut app = lock(&state)?;
    app.home.set_filter(payload);
    Ok(app.home.view())
}

#[tauri::command]
fn home_set_bookmark(
    state: Shared<'_>,
    payload: HomeBookmarkRequest,
) -> Result<ScreenResult<HomeView>, String> {
    let mut app = lock(&state)?;
    let notice = app.home.set_bookmark(payload.id.as_str(), payload.bookmarked);
    Ok(ScreenResult {
        notice,
        view: app.home.view(),
    })
}

#[tauri::command]
fn home_export(state: Shared<'_>) -> Result<SaveCsvResult, String> {
    let outcome = {
        let app = lock(&state)?;
        app.home.export_bookmarked(app.export_row_limit())
    };
    save_export(outcome)
}

#[tauri::command]
fn hr_load(state: Shared<'_>) -> Result<ScreenResult<HrView>, String> {
    let mut guard = lock(&state)?;
    let app = &mut *guard;
    let notice = app.hr.load(&app.store).err().map(|err| err.notice());
    Ok(ScreenResult {
        notice,
        view: app.hr.view(),
    })
}

#[tauri::command]
fn hr_set_filter(state: Shared<'_>, payload: FilterState) -> Result<HrView, String> {
    let mut app = lock(&state)?;
    app.hr.set_filter(payload);
    Ok(app.hr.view())
}

#[tauri::command]
fn hr_toggle_bookmark(
    state: Shared<'_>,
    payload: IdRequest,
) -> Result<ScreenResult<HrView>, String> {
    let mut guard = lock(&state)?;
    let app = &mut *guard;
    let notice = settle(app.hr.toggle_bookmark(&mut app.store, payload.id.as_str()));
    Ok(ScreenResult {
        notice: Some(notice),
        view: app.hr.view(),
    })
}

#[tauri::command]
fn hr_export(state: Shared<'_>) -> Result<SaveCsvResult, String> {
    let outcome = {
        let app = lock(&state)?;
        app.hr.export_bookmarks_today(app.export_row_limit())
    };
    save_export(outcome)
}

#[tauri::command]
fn admin_load(state: Shared<'_>) -> Result<ScreenResult<AdminView>, String> {
    let mut guard = lock(&state)?;
    let app = &mut *guard;
    let notice = app.admin.load(&app.store).err().map(|err| err.notice());
    Ok(ScreenResult {
        notice,
        view: app.admin.view(),
    })
}

fn admin_step(
    state: Shared<'_>,
    step: impl FnOnce(&mut AppState) -> Result<Notice, FlowError>,
) -> Result<ScreenResult<AdminView>, String> {
    let mut app = lock(&state)?;
    let notice = settle(step(&mut *app));
    Ok(ScreenResult {
        notice: Some(notice),
        view: app.admin.view(),
    })
}

#[tauri::command]
fn admin_add_student(
    state: Shared<'_>,
    payload: CandidateDraft,
) -> Result<ScreenResult<AdminView>, String> {
    admin_step(state, |app| app.admin.add_candidate(&mut app.store, payload))
}

#[tauri::command]
fn admin_update_student(
    state: Shared<'_>,
    payload: UpdateStudentRequest,
) -> Result<ScreenResult<AdminView>, String> {
    admin_step(state, |app| {
        app.admin
            .update_candidate(&mut app.store, payload.id.as_str(), payload.draft)
    })
}

#[tauri::command]
fn admin_delete_student(
    state: Shared<'_>,
    payload: IdRequest,
) -> Result<ScreenResult<AdminView>, String> {
    admin_step(state, |app| {
        app.admin.delete_candidate(&mut app.store, payload.id.as_str())
    })
}

#[tauri::command]
fn admin_add_key(
    state: Shared<'_>,
    payload: AccessKeyDraft,
) -> Result<ScreenResult<AdminView>, String> {
    admin_step(state, |app| app.admin.add_access_key(&mut app.store, payload))
}

#[tauri::command]
fn admin_set_key_active(
    state: Shared<'_>,
    payload: KeyActiveRequest,
) -> Result<ScreenResult<AdminView>, String> {
    admin_step(state, |app| {
        app.admin
            .set_access_key_active(&mut app.store, payload.id.as_str(), payload.is_active)
    })
}

#[tauri::command]
fn admin_delete_key(
    state: Shared<'_>,
    payload: IdRequest,
) -> Result<ScreenResult<AdminView>, String> {
    admin_step(state, |app| {
        app.admin.delete_access_key(&mut app.store, payload.id.as_str())
    })
}

#[tauri::command]
fn admin_set_account_disabled(
    state: Shared<'_>,
    payload: AccountDisabledRequest,
) -> Result<ScreenResult<AdminView>, String> {
    admin_step(state, |app| {
        app.set_account_disabled(payload.email.as_str(), payload.disabled)
    })
}

#[tauri::command]
fn clipboard_write(app: AppHandle, payload: ClipboardWriteRequest) -> Result<bool, String> {
    app.clipboard()
        .write_text(payload.text)
        .map_err(|err| err.to_string())?;
    Ok(true)
}

/// Copies a visible candidate's resume, LinkedIn and GitHub links, one per line.
#[tauri::command]
fn candidate_links_copy(
    app: AppHandle,
    state: Shared<'_>,
    payload: IdRequest,
) -> Result<Notice, String> {
    let text = {
        let guard = lock(&state)?;
        guard
            .home
            .unlocked()
            .iter()
            .chain(guard.hr.candidates())
            .find(|candidate| candidate.id == payload.id)
            .map(|candidate| candidate.links().join("\n"))
    };
    let Some(text) = text.filter(|links| !links.is_empty()) else {
        return Ok(Notice::info("No Links", "This profile has no links to copy."));
    };
    app.clipboard()
        .write_text(text)
        .map_err(|err| err.to_string())?;
    Ok(Notice::info("Copied", "Profile links copied to clipboard."))
}

#[tauri::command]
fn open_external(app: AppHandle, payload: OpenExternalRequest) -> Result<bool, String> {
    app.opener()
        .open_url(payload.url, Option::<String>::None)
        .map_err(|err: tauri_plugin_opener::Error| err.to_string())?;
    Ok(true)
}

fn main() {
    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .plugin(tauri_plugin_clipboard_manager::init())
        .setup(|app| {
            let root = storage_root_dir(app.handle())?;
            let paths = StoragePaths::new(root)?;
            let config = AppConfig::load_or_init(&paths)?;
            logging::init(config.log_filter.as_str());
            let state = AppState::with_config(paths, config)?;
            app.manage(Mutex::new(state));
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            app_version,
            platform_name,
            theme_get,
            theme_toggle,
            session_get,
            auth_sign_in,
            auth_sign_up,
            auth_sign_out,
            home_view,
            home_submit_key,
            home_reset,
            home_set_filter,
            home_set_bookmark,
            home_export,
            hr_load,
            hr_set_filter,
            hr_toggle_bookmark,
            hr_export,
            admin_load,
            admin_add_student,
            admin_update_student,
            admin_delete_student,
            admin_add_key,
            admin_set_key_active,
            admin_delete_key,
            admin_set_account_disabled,
            clipboard_write,
            candidate_links_copy,
            open_external
        ])
        .run(tauri::generate_context!())
        .expect("failed to run Roster Desk");
}
