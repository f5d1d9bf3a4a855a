use std::collections::HashMap;

use gloo_console::{error, info};
use gloo_utils::document;
use leaflet::{LatLng, Map, MapOptions, Marker, Popup, PopupOptions, TileLayer, TileLayerOptions};
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{
    js_sys::{Array, Function, Object, Reflect},
    Element, HtmlElement, Node,
};
use workout_lib::{
    config::AppConfig,
    summary::popup_content,
    workout::{Coords, Workout},
};
use yew::prelude::*;

/// Request to pan to a workout. `seq` makes repeated clicks on the same entry
/// count as a change.
#[derive(PartialEq, Clone, Copy, Debug)]
pub struct Focus {
    pub coords: Coords,
    pub seq: u32,
}

pub struct MapComponent {
    map: Map,
    container: HtmlElement,
    ready: bool,
    markers: HashMap<String, Marker>,
    last_focus: Option<Focus>,
    on_click: Option<Closure<dyn FnMut(JsValue)>>,
}

#[derive(PartialEq, Properties, Clone)]
pub struct Props {
    /// Set once the user's position is known.
    pub center: Option<Coords>,
    pub workouts: Vec<Workout>,
    pub focus: Option<Focus>,
    pub config: AppConfig,
    pub on_click: Callback<Coords>,
}

impl MapComponent {
    fn render_map(&self) -> Html {
        let node: &Node = &self.container.clone().into();
        Html::VRef(node.clone())
    }

    fn initialize(&mut self, center: Coords, props: &Props) {
        info!(format!("Loading map at https://www.google.com/maps/@{},{}", center.lat(), center.lng()));

        self.map.set_view(&LatLng::new(center.lat(), center.lng()), props.config.zoom_level);
        add_tile_layer(&self.map, &props.config);

        let on_click = props.on_click.clone();
        let handler = Closure::<dyn FnMut(JsValue)>::new(move |event: JsValue| {
            match Reflect::get(&event, &"latlng".into()) {
                Ok(lat_lng) => {
                    let lat_lng: LatLng = lat_lng.unchecked_into();
                    on_click.emit(Coords(lat_lng.lat(), lat_lng.lng()));
                }
                Err(err) => error!("Map click without a location", err),
            }
        });

        if let Err(err) = invoke(self.map.as_ref(), "on", &["click".into(), handler.as_ref().clone()]) {
            error!("Failed to listen for map clicks", err);
        }

        self.on_click = Some(handler);
        self.ready = true;
    }

    fn sync_markers(&mut self, props: &Props) {
        self.markers.retain(|id, marker| {
            let keep = props.workouts.iter().any(|w| &w.id == id);
            if !keep {
                marker.remove();
            }
            keep
        });

        for workout in &props.workouts {
            if !self.markers.contains_key(&workout.id) {
                let marker = make_marker(workout, &props.config);
                marker.add_to(&self.map);
                if let Err(err) = invoke(marker.as_ref(), "openPopup", &[]) {
                    error!("Failed to open popup", err);
                }
                self.markers.insert(workout.id.clone(), marker);
            }
        }
    }

    fn pan_to(&self, coords: Coords, config: &AppConfig) {
        let pan = Object::new();
        let options = Object::new();
        let set = |target: &Object, key: &str, value: JsValue| Reflect::set(target, &key.into(), &value);

        let result = set(&pan, "duration", config.pan_duration.into())
            .and_then(|_| set(&options, "animate", true.into()))
            .and_then(|_| set(&options, "pan", pan.into()))
            .and_then(|_| {
                let center: JsValue = LatLng::new(coords.lat(), coords.lng()).into();
                invoke(self.map.as_ref(), "setView", &[center, config.zoom_level.into(), options.into()])
            });

        if let Err(err) = result {
            error!("Failed to move to workout", err);
        }
    }
}

impl Component for MapComponent {
    type Message = ();
    type Properties = Props;

    fn create(_ctx: &Context<Self>) -> Self {
        let container: Element = document().create_element("div").unwrap();
        let container: HtmlElement = container.dyn_into().unwrap();
        container.set_class_name("map");

        let leaflet_map = Map::new_with_element(&container, &MapOptions::default());

        Self {
            map: leaflet_map,
            container,
            ready: false,
            markers: HashMap::new(),
            last_focus: None,
            on_click: None,
        }
    }

    fn rendered(&mut self, ctx: &Context<Self>, _first_render: bool) {
        let props = ctx.props();

        // Markers wait for the map, including those of workouts loaded from storage
        if !self.ready {
            match props.center {
                Some(center) => self.initialize(center, props),
                None => return,
            }
        }

        self.sync_markers(props);

        if props.focus != self.last_focus {
            self.last_focus = props.focus;
            if let Some(focus) = props.focus {
                self.pan_to(focus.coords, &props.config);
            }
        }
    }

    fn changed(&mut self, _ctx: &Context<Self>, _old_props: &Self::Properties) -> bool {
        self.map.invalidate_size(false);
        true
    }

    fn view(&self, _ctx: &Context<Self>) -> Html {
        html! {
            <div id="map">
                {self.render_map()}
            </div>
        }
    }
}

fn make_marker(workout: &Workout, config: &AppConfig) -> Marker {
    let popup_opts = PopupOptions::default();
    popup_opts.set_max_width(config.popup_max_width);
    popup_opts.set_min_width(config.popup_min_width);
    popup_opts.set_auto_close(false);
    popup_opts.set_close_on_click(false);
    popup_opts.set_class_name(workout.popup_class());

    let popup = Popup::new(&popup_opts, None);
    popup.set_content(&popup_content(workout).into());

    let marker = Marker::new(&LatLng::new(workout.coords.lat(), workout.coords.lng()));
    marker.bind_popup(&popup);
    marker
}

fn add_tile_layer(map: &Map, config: &AppConfig) {
    let opts = TileLayerOptions::new();
    opts.set_attribution(config.tile_attribution.clone());
    opts.set_update_when_idle(true);
    TileLayer::new_options(&config.tile_url, &opts).add_to(map);
}

/// Calls a Leaflet method by name.
fn invoke(target: &JsValue, method: &str, args: &[JsValue]) -> Result<JsValue, JsValue> {
    let function: Function = Reflect::get(target, &method.into())?.dyn_into()?;
    Reflect::apply(&function, target, &args.iter().collect::<Array>())
}
