use geocoin_core as game;
use gloo::storage::{LocalStorage, Storage};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use yew::prelude::*;

/// Game records kept in the browser's local storage.
#[derive(Debug, Default)]
pub(crate) struct LocalStore;

impl game::RecordStore for LocalStore {
    fn read(&self, key: &str) -> Option<String> {
        match LocalStorage::raw().get_item(key) {
            Ok(record) => record,
            Err(err) => {
                log::error!("Could not read {} from local storage: {:?}", key, err);
                None
            }
        }
    }

    fn write(&mut self, key: &str, record: &str) -> game::Result<()> {
        LocalStorage::raw().set_item(key, record).map_err(|err| {
            log::error!("Could not save {} to local storage: {:?}", key, err);
            game::GameError::Storage
        })
    }
}

/// Live `watchPosition` subscription, cleared when dropped.
pub(crate) struct SensorWatch {
    id: i32,
    _callback: Closure<dyn FnMut(web_sys::GeolocationPosition)>,
}

impl SensorWatch {
    pub(crate) fn start(callback: Callback<game::LatLng>) -> Option<Self> {
        let geolocation = match gloo::utils::window().navigator().geolocation() {
            Ok(geolocation) => geolocation,
            Err(err) => {
                log::error!("Geolocation is not available: {:?}", err);
                return None;
            }
        };

        let closure = Closure::<dyn FnMut(web_sys::GeolocationPosition)>::new(
            move |position: web_sys::GeolocationPosition| {
                let coords = position.coords();
                callback.emit(game::LatLng::new(coords.latitude(), coords.longitude()));
            },
        );

        match geolocation.watch_position(closure.as_ref().unchecked_ref()) {
            Ok(id) => {
                log::debug!("watching position, id: {}", id);
                Some(Self {
                    id,
                    _callback: closure,
                })
            }
            Err(err) => {
                log::error!("Could not watch position: {:?}", err);
                None
            }
        }
    }
}

impl Drop for SensorWatch {
    fn drop(&mut self) {
        if let Ok(geolocation) = gloo::utils::window().navigator().geolocation() {
            log::debug!("clearing position watch {}", self.id);
            geolocation.clear_watch(self.id);
        }
    }
}

#[derive(Properties, PartialEq)]
pub(crate) struct ModalProps {
    #[prop_or_default]
    pub children: Html,
}

/// Helper component to attatch the contents into the document.body instead of in the place where it's used.
#[function_component]
pub(crate) fn Modal(props: &ModalProps) -> Html {
    let modal_host = gloo::utils::body();
    create_portal(props.children.clone(), modal_host.into())
}
