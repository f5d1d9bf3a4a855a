use web_sys::{HtmlInputElement, HtmlSelectElement};
use workout_lib::{form::FormInput, workout::WorkoutType};
use yew::prelude::*;

#[derive(PartialEq, Properties, Clone)]
pub struct WorkoutFormProps {
    pub hidden: bool,
    /// Bumped on every map click so the distance field takes focus again.
    pub focus_seq: u32,
    /// Field values when the form is (re)mounted.
    pub initial: FormInput,
    pub on_submit: Callback<FormInput>,
}

/// Keeps what the user typed until the parent remounts it with a new key.
/// Only the numbers are cleared then, the type carries over.
#[function_component]
pub fn WorkoutForm(props: &WorkoutFormProps) -> Html {
    let fields = use_state(|| props.initial.clone());
    let distance_ref = use_node_ref();

    {
        let distance_ref = distance_ref.clone();
        use_effect_with((props.hidden, props.focus_seq), move |(hidden, _)| {
            if !*hidden {
                if let Some(input) = distance_ref.cast::<HtmlInputElement>() {
                    let _ = input.focus();
                }
            }
            || ()
        });
    }

    let on_input = |apply: fn(&mut FormInput, String)| {
        let fields = fields.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let mut next = (*fields).clone();
            apply(&mut next, input.value());
            fields.set(next);
        })
    };

    let on_type_change = {
        let fields = fields.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            let mut next = (*fields).clone();
            next.workout_type = select.value();
            fields.set(next);
        })
    };

    let onsubmit = {
        let fields = fields.clone();
        let on_submit = props.on_submit.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            on_submit.emit((*fields).clone());
        })
    };

    let cycling = fields.workout_type == WorkoutType::Cycling.as_str();
    let row_class = |hidden: bool| classes!("form__row", hidden.then_some("form__row--hidden"));

    html! {
        <form class={classes!("form", props.hidden.then_some("hidden"))} {onsubmit}>
            <div class="form__row">
                <label class="form__label">{"Type"}</label>
                <select class="form__input form__input--type" onchange={on_type_change}>
                    <option value="running" selected={!cycling}>{"Running"}</option>
                    <option value="cycling" selected={cycling}>{"Cycling"}</option>
                </select>
            </div>
            <div class="form__row">
                <label class="form__label">{"Distance"}</label>
                <input
                    class="form__input form__input--distance"
                    placeholder="km"
                    ref={distance_ref}
                    value={fields.distance.clone()}
                    oninput={on_input(|f, v| f.distance = v)}
                />
            </div>
            <div class="form__row">
                <label class="form__label">{"Duration"}</label>
                <input
                    class="form__input form__input--duration"
                    placeholder="min"
                    value={fields.duration.clone()}
                    oninput={on_input(|f, v| f.duration = v)}
                />
            </div>
            <div class={row_class(cycling)}>
                <label class="form__label">{"Cadence"}</label>
                <input
                    class="form__input form__input--cadence"
                    placeholder="step/min"
                    value={fields.cadence.clone()}
                    oninput={on_input(|f, v| f.cadence = v)}
                />
            </div>
            <div class={row_class(!cycling)}>
                <label class="form__label">{"Elev Gain"}</label>
                <input
                    class="form__input form__input--elevation"
                    placeholder="meters"
                    value={fields.elevation.clone()}
                    oninput={on_input(|f, v| f.elevation = v)}
                />
            </div>
            <button class="form__btn">{"OK"}</button>
        </form>
    }
}
