use chrono::Local;
use components::{
    map_component::{Focus, MapComponent},
    workout_form::WorkoutForm,
    workout_list::WorkoutList,
};
use gloo_console::{error, info, warn};
use gloo_utils::window;
use storage::LocalStore;
use wasm_bindgen::{closure::Closure, JsValue};
use wasm_bindgen_futures::spawn_local;
use web_sys::js_sys::{Object, Reflect};
use workout_lib::{
    config::AppConfig,
    form::FormInput,
    summary::WorkoutSummary,
    tracker::{Phase, SubmitError, Tracker},
    workout::{Coords, WorkoutType},
};
use yew::prelude::*;

mod components;
mod geolocation;
mod storage;

const INVALID_INPUT: &str = "Inputs have to be positive numbers!";

enum AppMsg {
    PositionAcquired(Coords),
    PositionFailed(geolocation::GeolocationError),
    MapClicked(Coords),
    Submit(FormInput),
    SelectWorkout(String),
    Reset,
}

struct App {
    tracker: Tracker<LocalStore>,
    /// Changing the key remounts the form, which clears it.
    form_key: u32,
    /// What the form starts with after a remount.
    next_form: FormInput,
    click_seq: u32,
    focus: Option<Focus>,
    _reset_hook: Option<Closure<dyn Fn()>>,
}

impl Component for App {
    type Message = AppMsg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let link = ctx.link().clone();

        spawn_local(async move {
            match geolocation::current_position().await {
                Ok(coords) => link.send_message(AppMsg::PositionAcquired(coords)),
                Err(err) => link.send_message(AppMsg::PositionFailed(err)),
            }
        });

        let mut tracker = Tracker::new(LocalStore::new(), AppConfig::from_build_env());
        match tracker.initialize() {
            Ok(0) => {}
            Ok(skipped) => warn!(format!("Skipped {skipped} unreadable stored workouts")),
            Err(err) => error!(format!("Ignoring stored workouts: {err}")),
        }
        info!(format!("Loaded {} workouts", tracker.workouts().len()));

        Self {
            tracker,
            form_key: 0,
            next_form: FormInput::new(WorkoutType::Running),
            click_seq: 0,
            focus: None,
            _reset_hook: install_reset_hook(ctx.link().callback(|()| AppMsg::Reset)),
        }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            AppMsg::PositionAcquired(coords) => {
                let pending = self.tracker.position_acquired(coords).len();
                info!(format!("Position acquired, {pending} workouts to place on the map"));
            }
            AppMsg::PositionFailed(err) => {
                self.tracker.position_failed();
                warn!(format!("Cannot get current position: {err}"));
            }
            AppMsg::MapClicked(coords) => {
                if !self.tracker.map_clicked(coords) {
                    return false;
                }
                self.click_seq += 1;
            }
            AppMsg::Submit(form) => match self.tracker.submit(&form, Local::now()) {
                Ok(workout) => {
                    info!(format!("New workout: {workout:?}"));
                    self.next_form = form.cleared();
                    self.form_key += 1;
                }
                Err(SubmitError::Invalid(err)) => {
                    info!(format!("Rejected workout: {err}"));
                    if let Err(err) = window().alert_with_message(INVALID_INPUT) {
                        error!("Failed to show alert", err);
                    }
                    return false;
                }
                Err(err) => {
                    error!(format!("Failed to add workout: {err}"));
                    return false;
                }
            },
            AppMsg::SelectWorkout(id) => match self.tracker.locate(&id) {
                Some(coords) => {
                    let seq = self.focus.map_or(0, |f| f.seq + 1);
                    self.focus = Some(Focus { coords, seq });
                }
                None => {
                    warn!(format!("No workout with id {id}"));
                    return false;
                }
            },
            AppMsg::Reset => {
                self.tracker.reset();
                if let Err(err) = window().location().reload() {
                    error!("Failed to reload", err);
                }
            }
        }
        true
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let on_submit = link.callback(AppMsg::Submit);
        let on_select = link.callback(AppMsg::SelectWorkout);
        let on_click = link.callback(AppMsg::MapClicked);

        let summaries: Vec<WorkoutSummary> = self.tracker.workouts().iter().map(WorkoutSummary::new).collect();
        let form_hidden = self.tracker.phase() != Phase::FormOpen;

        html! { <>
            <div class="sidebar">
                <ul class="workouts">
                    <WorkoutForm
                        key={self.form_key.to_string()}
                        hidden={form_hidden}
                        focus_seq={self.click_seq}
                        initial={self.next_form.clone()}
                        {on_submit}
                    />
                    <WorkoutList workouts={summaries} {on_select} />
                </ul>
            </div>
            <MapComponent
                center={self.tracker.position()}
                workouts={self.tracker.workouts().to_vec()}
                focus={self.focus}
                config={self.tracker.config().clone()}
                {on_click}
            />
        </> }
    }
}

/// Exposes `app.reset()` on the console.
fn install_reset_hook(on_reset: Callback<()>) -> Option<Closure<dyn Fn()>> {
    let hook = Closure::<dyn Fn()>::new(move || on_reset.emit(()));
    let app = Object::new();

    let installed = Reflect::set(&app, &"reset".into(), hook.as_ref())
        .and_then(|_| Reflect::set(&window(), &"app".into(), &JsValue::from(app)));

    match installed {
        Ok(_) => {
            info!("⛔ Type 'app.reset()' in the console to reset all saved workouts.");
            Some(hook)
        }
        Err(err) => {
            error!("Failed to install app.reset()", err);
            None
        }
    }
}

fn main() {
    yew::Renderer::<App>::new().render();
}
