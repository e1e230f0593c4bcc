/// Popup UI for the YouTube Sentiment Analyzer extension

use yew::prelude::*;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use patternfly_yew::prelude::*;
use serde::Deserialize;
use crate::api::ApiClient;
use crate::comment::{BatchResponse, HealthStatus, Sentiment};
use crate::error::AnalyzerError;
use crate::messages::{ContentRequest, ContentResponse};
use crate::report::{SentimentFilter, csv_filename, is_watch_page, summary_text, to_csv};
use crate::settings::{API_URL_KEY, DEFAULT_API_URL, Settings, THEME_KEY, Theme, validate_api_url};
use crate::ui::components::{CommentList, FilterBar, SentimentChart, StatCard};
use std::cell::RefCell;
use std::rc::Rc;

const FLASH_MILLIS: i32 = 3000;

// Import JS bridge functions
#[wasm_bindgen(module = "/popup.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn getActiveTab() -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn sendTabMessage(tab_id: i32, message: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn getSyncStorage(keys: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn setSyncStorage(items: JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn copyToClipboard(text: &str) -> Result<(), JsValue>;

    fn downloadText(data: &str, filename: &str, mime_type: &str);
}

#[derive(Debug, Clone, Deserialize)]
struct ActiveTab {
    id: Option<i32>,
    #[serde(default)]
    url: Option<String>,
}

#[derive(Clone, PartialEq)]
enum AppState {
    Idle,
    Loading(String),
    Error(String),
}

/// Transient success message. Each one gets a fresh id so a stale timer
/// cannot clear a newer message.
#[derive(Clone, Debug, Default, PartialEq)]
struct Flash {
    id: u32,
    message: Option<String>,
}

enum FlashAction {
    Show { id: u32, message: String },
    Expire(u32),
}

impl Reducible for Flash {
    type Action = FlashAction;

    fn reduce(self: Rc<Self>, action: FlashAction) -> Rc<Self> {
        match action {
            FlashAction::Show { id, message } => Rc::new(Flash {
                id,
                message: Some(message),
            }),
            FlashAction::Expire(id) if id == self.id && self.message.is_some() => {
                Rc::new(Flash { id, message: None })
            }
            FlashAction::Expire(_) => self,
        }
    }
}

/// Shows flash messages and schedules their expiry
#[derive(Clone)]
struct Flasher {
    flash: UseReducerDispatcher<Flash>,
    next_id: Rc<RefCell<u32>>,
    state: UseStateHandle<AppState>,
}

impl Flasher {
    /// Show a success message that clears itself after a few seconds.
    /// It replaces any error currently on screen.
    fn show(&self, message: &str) {
        if matches!(*self.state, AppState::Error(_)) {
            self.state.set(AppState::Idle);
        }

        let id = {
            let mut next_id = self.next_id.borrow_mut();
            *next_id = next_id.wrapping_add(1);
            *next_id
        };
        self.flash.dispatch(FlashAction::Show {
            id,
            message: message.to_string(),
        });

        let flash = self.flash.clone();
        let clear = Closure::once_into_js(move || flash.dispatch(FlashAction::Expire(id)));
        if let Some(window) = web_sys::window() {
            if let Err(e) = window.set_timeout_with_callback_and_timeout_and_arguments_0(
                clear.unchecked_ref(),
                FLASH_MILLIS,
            ) {
                log::warn!("Failed to schedule flash clear: {}", AnalyzerError::bridge(e));
            }
        }
    }
}

#[function_component(App)]
pub fn app() -> Html {
    let state = use_state(|| AppState::Idle);
    let flash_state = use_reducer(Flash::default);
    let flash_ids = use_mut_ref(|| 0u32);
    let api_url_input = use_state(|| DEFAULT_API_URL.to_string());
    let theme = use_state(Theme::default);
    let results = use_state(|| None::<BatchResponse>);
    let filter = use_state(SentimentFilter::default);
    let flash = Flasher {
        flash: flash_state.dispatcher(),
        next_id: flash_ids,
        state: state.clone(),
    };

    // Load settings on mount
    {
        let api_url_input = api_url_input.clone();
        let theme = theme.clone();
        let state = state.clone();
        use_effect_with((), move |_| {
            spawn_local(async move {
                match load_settings().await {
                    Ok(settings) => {
                        api_url_input.set(settings.api_url().to_string());
                        apply_theme(settings.theme());
                        theme.set(settings.theme());
                    }
                    Err(e) => {
                        log::error!("Failed to load settings: {}", e);
                        state.set(AppState::Error(e.to_string()));
                    }
                }
            });
            || ()
        });
    }

    let on_api_url_input = {
        let api_url_input = api_url_input.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                api_url_input.set(input.value());
            }
        })
    };

    // Save API URL handler
    let on_save_url = {
        let api_url_input = api_url_input.clone();
        let state = state.clone();
        let flash = flash.clone();

        Callback::from(move |_| {
            let url = match validate_api_url(&api_url_input) {
                Ok(url) => url,
                Err(e) => {
                    state.set(AppState::Error(e.to_string()));
                    return;
                }
            };

            let state = state.clone();
            let flash = flash.clone();
            spawn_local(async move {
                match save_setting(API_URL_KEY, &url).await {
                    Ok(_) => {
                        state.set(AppState::Idle);
                        flash.show("URL saved!");
                    }
                    Err(e) => state.set(AppState::Error(e.to_string())),
                }
            });
        })
    };

    // Test connection handler
    let on_test_connection = {
        let api_url_input = api_url_input.clone();
        let state = state.clone();
        let flash = flash.clone();

        Callback::from(move |_| {
            let base_url = (*api_url_input).clone();
            let state = state.clone();
            let flash = flash.clone();

            state.set(AppState::Loading("Checking API...".to_string()));

            spawn_local(async move {
                match check_health(&base_url).await {
                    Ok(health) => {
                        state.set(AppState::Idle);
                        let model = health.model_type.unwrap_or_else(|| "unknown model".to_string());
                        flash.show(&format!("API {} ({})", health.status, model));
                    }
                    Err(e) => {
                        log::error!("Health check failed: {}", e);
                        state.set(AppState::Error(e.to_string()));
                    }
                }
            });
        })
    };

    // Theme toggle handler
    let on_toggle_theme = {
        let theme = theme.clone();
        Callback::from(move |_| {
            let new_theme = theme.toggled();
            apply_theme(new_theme);
            theme.set(new_theme);

            spawn_local(async move {
                if let Err(e) = save_setting(THEME_KEY, new_theme.as_str()).await {
                    log::error!("Failed to save theme: {}", e);
                }
            });
        })
    };

    let on_refresh = Callback::from(|_| {
        if let Some(window) = web_sys::window() {
            if let Err(e) = window.location().reload() {
                log::error!("Reload failed: {}", AnalyzerError::bridge(e));
            }
        }
    });

    // Analyze handler
    let on_analyze = {
        let state = state.clone();
        let results = results.clone();

        Callback::from(move |_| {
            let state = state.clone();
            let results = results.clone();

            state.set(AppState::Loading("Reading comments...".to_string()));

            spawn_local(async move {
                let progress = {
                    let state = state.clone();
                    move |msg: String| state.set(AppState::Loading(msg))
                };

                match analyze_active_tab(progress).await {
                    Ok(response) => {
                        results.set(Some(response));
                        state.set(AppState::Idle);
                    }
                    Err(e) => {
                        log::error!("Analysis failed: {}", e);
                        state.set(AppState::Error(e.to_string()));
                    }
                }
            });
        })
    };

    let on_filter = {
        let filter = filter.clone();
        Callback::from(move |selected: SentimentFilter| filter.set(selected))
    };

    // Copy summary handler
    let on_copy = {
        let results = results.clone();
        let state = state.clone();
        let flash = flash.clone();

        Callback::from(move |_| {
            let Some(response) = (*results).clone() else {
                return;
            };
            let state = state.clone();
            let flash = flash.clone();

            spawn_local(async move {
                let text = summary_text(&response.predictions);
                match copyToClipboard(&text).await {
                    Ok(_) => flash.show("Results copied!"),
                    Err(e) => state.set(AppState::Error(AnalyzerError::bridge(e).to_string())),
                }
            });
        })
    };

    // Export CSV handler
    let on_export = {
        let results = results.clone();
        let flash = flash.clone();

        Callback::from(move |_| {
            if let Some(response) = &*results {
                let csv = to_csv(&response.predictions);
                let filename = csv_filename(js_sys::Date::now() as i64);
                downloadText(&csv, &filename, "text/csv");
                flash.show("CSV exported!");
            }
        })
    };

    let is_busy = matches!(*state, AppState::Loading(_));
    let flash_message = flash_state
        .message
        .clone()
        .filter(|_| !matches!(*state, AppState::Error(_)));

    html! {
        <div class="popup">
            <div class="header">
                <h1 class="popup-title">{"YouTube Sentiment Analyzer"}</h1>
                <div class="header-actions">
                    <button class="icon-btn" title="Toggle theme" onclick={on_toggle_theme}>
                        {theme.toggle_icon()}
                    </button>
                    <button class="icon-btn" title="Refresh" onclick={on_refresh}>
                        {"🔄"}
                    </button>
                </div>
            </div>

            // API settings
            <div class="settings-row">
                <input
                    type="text"
                    class="api-url-input"
                    placeholder={DEFAULT_API_URL}
                    value={(*api_url_input).clone()}
                    oninput={on_api_url_input}
                />
                <Button onclick={on_save_url} disabled={is_busy} variant={ButtonVariant::Secondary}>
                    {"Save"}
                </Button>
                <Button onclick={on_test_connection} disabled={is_busy} variant={ButtonVariant::Secondary}>
                    {"Test"}
                </Button>
            </div>

            <Button onclick={on_analyze} disabled={is_busy} variant={ButtonVariant::Primary} block={true}>
                {"📊 Analyze Comments"}
            </Button>

            // Flash message
            if let Some(message) = flash_message {
                <Alert r#type={AlertType::Success} title={format!("✅ {}", message)} inline={true}>
                </Alert>
            }

            // Status display
            {match &*state {
                AppState::Loading(msg) => html! {
                    <div class="loading-text-center">
                        <Spinner />
                        <p class="loading-text">{msg}</p>
                    </div>
                },
                AppState::Error(err) => html! {
                    <div class="message-top-margin">
                        <Alert r#type={AlertType::Danger} title={"Error"} inline={true}>
                            {format!("❌ {}", err)}
                        </Alert>
                    </div>
                },
                AppState::Idle => html! {}
            }}

            // Results
            if let Some(response) = &*results {
                {render_results(response, *filter, on_filter.clone())}
                <div class="extra-actions">
                    <Button onclick={on_copy} variant={ButtonVariant::Secondary}>
                        {"📋 Copy Results"}
                    </Button>
                    <Button onclick={on_export} variant={ButtonVariant::Secondary}>
                        {"📥 Export CSV"}
                    </Button>
                </div>
            }

            <p class="footer-popup">
                {"YouTube Sentiment Analyzer v0.1.0"}
            </p>
        </div>
    }
}

fn render_results(response: &BatchResponse, filter: SentimentFilter, on_filter: Callback<SentimentFilter>) -> Html {
    let stats = &response.statistics;
    let counts = stats.counts(response.total_comments);

    html! {
        <>
            <div class="statistics">
                <h2 class="stats-title">{format!("{} comments analyzed", response.total_comments)}</h2>
                <div class="stats-grid">
                    <StatCard sentiment={Sentiment::Positive} title="Positive"
                        percentage={stats.positive_percentage} count={counts.positive} />
                    <StatCard sentiment={Sentiment::Neutral} title="Neutral"
                        percentage={stats.neutral_percentage} count={counts.neutral} />
                    <StatCard sentiment={Sentiment::Negative} title="Negative"
                        percentage={stats.negative_percentage} count={counts.negative} />
                </div>
                <SentimentChart statistics={stats.clone()} />
            </div>
            <FilterBar active={filter} on_select={on_filter} />
            <CommentList predictions={filter.apply(&response.predictions)} />
        </>
    }
}

// Helper functions

/// Run the whole extraction and classification cycle for the active tab
async fn analyze_active_tab<F>(progress: F) -> Result<BatchResponse, AnalyzerError>
where
    F: Fn(String),
{
    let tab = get_active_tab().await?;
    let url = tab.url.unwrap_or_default();
    if !is_watch_page(&url) {
        return Err(AnalyzerError::NotAWatchPage);
    }
    let tab_id = tab
        .id
        .ok_or_else(|| AnalyzerError::Bridge("Active tab has no id".to_string()))?;

    send_to_content_script(tab_id, &ContentRequest::Ping)
        .await
        .map_err(|e| AnalyzerError::ContentScriptUnavailable(e.to_string()))?;

    let comments = send_to_content_script(tab_id, &ContentRequest::ExtractComments)
        .await?
        .into_comments()?;
    log::info!("{} comments extracted", comments.len());

    let settings = load_settings().await?;
    let client = ApiClient::new(settings.api_url())?;

    progress(format!("Analyzing {} comments...", comments.len()));
    client.predict_batch(&comments).await
}

async fn check_health(base_url: &str) -> Result<HealthStatus, AnalyzerError> {
    ApiClient::new(base_url)?.health().await
}

async fn get_active_tab() -> Result<ActiveTab, AnalyzerError> {
    let tab_js = getActiveTab().await.map_err(AnalyzerError::bridge)?;
    if tab_js.is_null() || tab_js.is_undefined() {
        return Err(AnalyzerError::Bridge("No active tab".to_string()));
    }
    serde_wasm_bindgen::from_value(tab_js).map_err(|e| AnalyzerError::decode("active tab", e))
}

async fn send_to_content_script(tab_id: i32, request: &ContentRequest) -> Result<ContentResponse, AnalyzerError> {
    let message = serde_wasm_bindgen::to_value(request)
        .map_err(|e| AnalyzerError::decode("content request", e))?;

    let reply = sendTabMessage(tab_id, message)
        .await
        .map_err(AnalyzerError::bridge)?;

    if reply.is_null() || reply.is_undefined() {
        return Err(AnalyzerError::ContentScriptUnavailable("empty reply".to_string()));
    }

    serde_wasm_bindgen::from_value(reply).map_err(|e| AnalyzerError::decode("content reply", e))
}

async fn load_settings() -> Result<Settings, AnalyzerError> {
    let keys = serde_wasm_bindgen::to_value(&[API_URL_KEY, THEME_KEY])
        .map_err(|e| AnalyzerError::decode("settings keys", e))?;

    let settings_js = getSyncStorage(keys).await.map_err(AnalyzerError::bridge)?;

    if settings_js.is_null() || settings_js.is_undefined() {
        Ok(Settings::default())
    } else {
        serde_wasm_bindgen::from_value(settings_js).map_err(|e| AnalyzerError::decode("settings", e))
    }
}

async fn save_setting(key: &str, value: &str) -> Result<(), AnalyzerError> {
    let items = js_sys::Object::new();
    js_sys::Reflect::set(&items, &JsValue::from_str(key), &JsValue::from_str(value))
        .map_err(AnalyzerError::bridge)?;

    setSyncStorage(items.into()).await.map_err(AnalyzerError::bridge)
}

fn apply_theme(theme: Theme) {
    let Some(body) = web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.body())
    else {
        return;
    };

    let result = match theme {
        Theme::Dark => body.set_attribute("data-theme", theme.body_attribute()),
        Theme::Light => body.remove_attribute("data-theme"),
    };
    if let Err(e) = result {
        log::warn!("Failed to apply theme: {}", AnalyzerError::bridge(e));
    }
}
