use tauri::State;

use crate::{
    timer::{SessionSnapshot, TimerController},
    AppState,
};

fn controller_from_state(state: &State<'_, AppState>) -> TimerController {
    state.core.timer.clone()
}

#[tauri::command]
pub async fn get_timer_state(state: State<'_, AppState>) -> Result<SessionSnapshot, String> {
    let controller = controller_from_state(&state);
    Ok(controller.snapshot().await)
}

#[tauri::command]
pub async fn start_timer(state: State<'_, AppState>) -> Result<SessionSnapshot, String> {
    let controller = controller_from_state(&state);
    controller.start().await;
    Ok(controller.snapshot().await)
}

#[tauri::command]
pub async fn pause_timer(state: State<'_, AppState>) -> Result<SessionSnapshot, String> {
    let controller = controller_from_state(&state);
    controller.pause().await;
    Ok(controller.snapshot().await)
}

#[tauri::command]
pub async fn resume_timer(state: State<'_, AppState>) -> Result<SessionSnapshot, String> {
    let controller = controller_from_state(&state);
    controller.resume().await;
    Ok(controller.snapshot().await)
}

#[tauri::command]
pub async fn reset_timer(state: State<'_, AppState>) -> Result<SessionSnapshot, String> {
    let controller = controller_from_state(&state);
    controller.reset().await;
    Ok(controller.snapshot().await)
}
