pub mod actions;
pub mod camera;
pub mod context;
pub mod detection;
pub mod dispatch;
pub mod gesture;
pub mod presence;
pub mod settings;
pub mod surface;
pub mod timer;
mod utils;

pub use context::CoreContext;

#[cfg(feature = "desktop")]
pub use desktop::run;

#[cfg(feature = "desktop")]
mod desktop {
    use std::{sync::Arc, time::Duration};

    use log::warn;
    use tauri::{Manager, State};
    use tokio::sync::Mutex;

    use crate::{
        camera::{
            commands::{
                get_cameras, select_camera, set_camera_list, start_frame_stream,
                stop_frame_stream, submit_frame,
            },
            CameraRegistry,
        },
        context::CoreContext,
        detection::{DetectionState, PAUSE_PRESETS_MINUTES},
        settings::{PomodoroSettings, SettingsStore, UserSettings},
        surface::Surface,
        timer::commands::{get_timer_state, pause_timer, reset_timer, resume_timer, start_timer},
    };

    pub(crate) struct AppState {
        pub(crate) core: CoreContext,
        pub(crate) settings: SettingsStore,
        pub(crate) cameras: Mutex<CameraRegistry>,
    }

    /// `minutes: None` pauses until detection is enabled again.
    #[tauri::command]
    async fn pause_detection(
        state: State<'_, AppState>,
        minutes: Option<u64>,
    ) -> Result<DetectionState, String> {
        match minutes {
            Some(0) => return Err("pause length must be at least one minute".into()),
            Some(minutes) => {
                if !PAUSE_PRESETS_MINUTES.contains(&minutes) {
                    warn!("non-preset detection pause of {minutes} minutes");
                }
                state
                    .core
                    .detection
                    .pause_for(Duration::from_secs(minutes * 60))
                    .await;
            }
            None => state.core.detection.disable().await,
        }
        Ok(state.core.detection.state().await)
    }

    #[tauri::command]
    async fn enable_detection(state: State<'_, AppState>) -> Result<DetectionState, String> {
        state.core.detection.enable().await;
        Ok(state.core.detection.state().await)
    }

    #[tauri::command]
    async fn detection_state(state: State<'_, AppState>) -> Result<DetectionState, String> {
        Ok(state.core.detection.state().await)
    }

    #[tauri::command]
    fn speech_finished(state: State<'_, AppState>) {
        state.core.speaker.finished();
    }

    #[tauri::command]
    fn get_settings(state: State<'_, AppState>) -> Result<UserSettings, String> {
        Ok(state.settings.snapshot())
    }

    #[tauri::command]
    async fn update_pomodoro_settings(
        state: State<'_, AppState>,
        settings: PomodoroSettings,
    ) -> Result<(), String> {
        state
            .settings
            .update_pomodoro(settings.clone())
            .map_err(|e| e.to_string())?;
        state.core.timer.set_durations(settings.durations()).await;
        Ok(())
    }

    #[cfg_attr(mobile, tauri::mobile_entry_point)]
    pub fn run() {
        // Initialize logging (reads RUST_LOG env var)
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();

        log::info!("TimeQuacker starting up...");

        tauri::Builder::default()
            .setup(|app| {
                let result = (|| -> anyhow::Result<()> {
                    let app_data_dir = app
                        .path()
                        .app_data_dir()
                        .map_err(|err| anyhow::anyhow!(err))?;
                    std::fs::create_dir_all(&app_data_dir)?;

                    let settings_path = app_data_dir.join("settings.json");
                    let settings_store = SettingsStore::new(settings_path)?;

                    let surface: Arc<dyn Surface> = Arc::new(app.handle().clone());
                    let core = CoreContext::new(&settings_store.snapshot(), surface)?;

                    app.manage(AppState {
                        core,
                        settings: settings_store,
                        cameras: Mutex::new(CameraRegistry::default()),
                    });

                    Ok(())
                })();

                result.map_err(|err| err.into())
            })
            .invoke_handler(tauri::generate_handler![
                get_timer_state,
                start_timer,
                pause_timer,
                resume_timer,
                reset_timer,
                start_frame_stream,
                stop_frame_stream,
                submit_frame,
                set_camera_list,
                select_camera,
                get_cameras,
                pause_detection,
                enable_detection,
                detection_state,
                speech_finished,
                get_settings,
                update_pomodoro_settings,
            ])
            .build(tauri::generate_context!())
            .expect("error while building tauri application")
            .run(|app_handle, event| {
                if let tauri::RunEvent::Exit = event {
                    let state = app_handle.state::<AppState>();
                    if let Err(err) = tauri::async_runtime::block_on(state.core.shutdown()) {
                        warn!("camera stream did not shut down cleanly: {err}");
                    }
                }
            });
    }
}

#[cfg(feature = "desktop")]
pub(crate) use desktop::AppState;
