use tauri::State;
use uuid::Uuid;

use crate::{
    camera::{CameraDevice, CameraRegistry},
    gesture::DetectionFrame,
    surface::Surface,
    AppState,
};

#[tauri::command]
pub async fn start_frame_stream(state: State<'_, AppState>) -> Result<Uuid, String> {
    state
        .core
        .streams
        .lock()
        .await
        .start_stream()
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn stop_frame_stream(state: State<'_, AppState>) -> Result<(), String> {
    state
        .core
        .streams
        .lock()
        .await
        .stop_stream()
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn submit_frame(
    state: State<'_, AppState>,
    stream_id: Uuid,
    frame: DetectionFrame,
) -> Result<(), String> {
    let sender = state
        .core
        .streams
        .lock()
        .await
        .frame_sender(stream_id)
        .map_err(|e| e.to_string())?;
    sender.send(frame).await.map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn set_camera_list(
    state: State<'_, AppState>,
    app_handle: tauri::AppHandle,
    devices: Vec<CameraDevice>,
) -> Result<Option<String>, String> {
    let selected = {
        let mut cameras = state.cameras.lock().await;
        cameras.update(devices).map(str::to_string)
    };
    app_handle.camera_selected(selected.as_deref());
    Ok(selected)
}

#[tauri::command]
pub async fn select_camera(
    state: State<'_, AppState>,
    app_handle: tauri::AppHandle,
    device_id: String,
) -> Result<(), String> {
    if !state.cameras.lock().await.select(&device_id) {
        return Err(format!("unknown camera {device_id}"));
    }
    app_handle.camera_selected(Some(&device_id));
    Ok(())
}

#[tauri::command]
pub async fn get_cameras(state: State<'_, AppState>) -> Result<CameraRegistry, String> {
    Ok(state.cameras.lock().await.clone())
}
