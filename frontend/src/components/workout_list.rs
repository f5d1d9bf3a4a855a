use workout_lib::summary::WorkoutSummary;
use yew::prelude::*;

#[derive(PartialEq, Properties, Clone)]
pub struct WorkoutListProps {
    /// In creation order; shown newest first.
    pub workouts: Vec<WorkoutSummary>,
    pub on_select: Callback<String>,
}

#[function_component]
pub fn WorkoutList(props: &WorkoutListProps) -> Html {
    props
        .workouts
        .iter()
        .rev()
        .map(|summary| {
            let id = summary.id.clone();
            let on_select = props.on_select.clone();
            let onclick = Callback::from(move |_| on_select.emit(id.clone()));

            html! {
                <li key={summary.id.clone()} class={summary.class.clone()} data-id={summary.id.clone()} {onclick}>
                    <h2 class="workout__title">{summary.title.clone()}</h2>
                    { for summary.details.iter().map(|detail| html! {
                        <div class="workout__details">
                            <span class="workout__icon">{detail.icon}</span>
                            <span class="workout__value">{detail.value.clone()}</span>
                            <span class="workout__unit">{detail.unit}</span>
                        </div>
                    }) }
                </li>
            }
        })
        .collect::<Html>()
}
