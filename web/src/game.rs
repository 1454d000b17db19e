use crate::utils::*;
use clap::Args;
use geocoin_core as game;
use gloo::timers::callback::Interval;
use std::collections::BTreeSet;
use yew::prelude::*;

/// Save tick period, roughly one animation frame.
const SAVE_INTERVAL_MS: u32 = 16;

#[derive(Copy, Clone, Debug, PartialEq)]
enum TileKind {
    Empty,
    Cache { coins: usize },
}

#[derive(Copy, Clone, Debug, PartialEq)]
struct TileState {
    kind: TileKind,
    player: bool,
    trail: bool,
}

fn tile_state_at(
    session: &game::Session<impl game::RecordStore>,
    trail: &BTreeSet<game::Cell>,
    cell: game::Cell,
) -> TileState {
    let kind = session
        .cache_at(cell)
        .map_or(TileKind::Empty, |cache| TileKind::Cache {
            coins: cache.coins().len(),
        });
    TileState {
        kind,
        player: session.player_cell() == cell,
        trail: trail.contains(&cell),
    }
}

fn trail_cells(session: &game::Session<impl game::RecordStore>) -> BTreeSet<game::Cell> {
    session
        .state()
        .trail
        .iter()
        .map(|&point| session.board().coords_for_point(point))
        .collect()
}

fn popup_text(cache: &game::Geocache) -> String {
    format!(
        "There is a {} here at \"{}\", contains: ",
        cache.description(),
        cache.cell()
    )
}

fn bounds_title(bounds: game::Bounds) -> String {
    format!(
        "{:.4},{:.4} .. {:.4},{:.4}",
        bounds.min.lat, bounds.min.lng, bounds.max.lat, bounds.max.lng
    )
}

/// Drops the popup selection once its cache has despawned, returns whether it did.
fn clear_lost_selection(
    session: &game::Session<impl game::RecordStore>,
    selected: &mut Option<game::Cell>,
) -> bool {
    let lost = selected.is_some_and(|cell| session.cache_at(cell).is_none());
    if lost {
        *selected = None;
    }
    lost
}

pub trait HasUpdate {
    fn has_update(self) -> bool;
}

impl HasUpdate for game::Result<game::TransferOutcome> {
    fn has_update(self) -> bool {
        match self {
            Ok(outcome) => outcome.has_update(),
            Err(err) => {
                log::warn!("transfer rejected: {}", err);
                false
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Msg {
    Move(game::Direction),
    ToggleSensor,
    SensorPosition(game::LatLng),
    SelectCache(Option<game::Cell>),
    Take(game::Cell),
    Deposit(game::Cell),
    Reset,
    SaveTick,
}

#[derive(Properties, Clone, PartialEq)]
struct TileProps {
    cell: game::Cell,
    state: TileState,
    title: AttrValue,
    callback: Callback<Msg>,
}

#[function_component(TileView)]
fn tile_component(props: &TileProps) -> Html {
    let TileProps {
        cell,
        state,
        title,
        callback,
    } = props.clone();

    let mut class = classes!(
        "tile",
        match state.kind {
            TileKind::Empty => classes!(),
            TileKind::Cache { coins: 0 } => classes!("cache", "empty"),
            TileKind::Cache { .. } => classes!("cache"),
        }
    );
    if state.player {
        class.push("player");
    }
    if state.trail {
        class.push("trail");
    }

    let onclick = match state.kind {
        TileKind::Cache { .. } => Some(Callback::from(move |_: MouseEvent| {
            log::trace!("({}) clicked", cell);
            callback.emit(Msg::SelectCache(Some(cell)));
        })),
        TileKind::Empty => None,
    };

    html! {
        <td {class} {title} {onclick}/>
    }
}

/// Overrides for the game config, passed through the location hash.
#[derive(Args, Properties, Debug, Clone, PartialEq, Default)]
pub(crate) struct GameProps {
    /// Tile edge length in degrees
    #[arg(long)]
    pub(crate) tile_degrees: Option<f64>,

    /// Half width of the cache spawn window, in tiles
    #[arg(long)]
    pub(crate) neighborhood: Option<game::Coord>,

    /// Radius of board neighborhood queries, in tiles
    #[arg(long)]
    pub(crate) visibility_radius: Option<game::Coord>,

    /// Chance for a tile to hold a cache
    #[arg(long)]
    pub(crate) spawn_probability: Option<f64>,
}

impl GameProps {
    fn config(&self) -> game::GameConfig {
        let default = game::GameConfig::default();
        game::GameConfig {
            tile_degrees: self.tile_degrees.unwrap_or(default.tile_degrees),
            neighborhood_size: self.neighborhood.unwrap_or(default.neighborhood_size),
            visibility_radius: self
                .visibility_radius
                .unwrap_or(default.visibility_radius),
            spawn_probability: self
                .spawn_probability
                .unwrap_or(default.spawn_probability),
            ..default
        }
        .sanitized()
    }
}

pub(crate) struct GameView {
    session: game::Session<LocalStore>,
    selected: Option<game::Cell>,
    sensor: Option<SensorWatch>,
    _save_interval: Interval,
}

impl GameView {
    fn create_save_interval(ctx: &Context<Self>) -> Interval {
        let link = ctx.link().clone();
        Interval::new(SAVE_INTERVAL_MS, move || link.send_message(Msg::SaveTick))
    }

    fn apply_regenerate(&mut self, outcome: game::RegenerateOutcome) -> bool {
        log::trace!(
            "spawned: {:?}, despawned: {:?}",
            outcome.spawned,
            outcome.despawned
        );
        let selection_lost = clear_lost_selection(&self.session, &mut self.selected);
        outcome.has_update() || selection_lost
    }

    fn view_popup(&self, ctx: &Context<Self>) -> Html {
        let Some(cache) = self.selected.and_then(|cell| self.session.cache_at(cell)) else {
            return html! {};
        };
        let cell = cache.cell();
        let cb_take = ctx.link().callback(move |_: MouseEvent| Msg::Take(cell));
        let cb_deposit = ctx.link().callback(move |_: MouseEvent| Msg::Deposit(cell));
        let cb_close = ctx.link().callback(|_: MouseEvent| Msg::SelectCache(None));

        html! {
            <Modal>
                <dialog class="popup" open={true}>
                    <div>{popup_text(cache)}<span class="value">{cache.contents_text()}</span></div>
                    <button onclick={cb_take}>{"take"}</button>
                    <button onclick={cb_deposit}>{"deposit"}</button>
                    <button onclick={cb_close}>{"close"}</button>
                </dialog>
            </Modal>
        }
    }
}

impl Component for GameView {
    type Message = Msg;
    type Properties = GameProps;

    fn create(ctx: &Context<Self>) -> Self {
        let config = ctx.props().config();
        log::debug!("config: {:?}", config);
        Self {
            session: game::Session::load(config, LocalStore),
            selected: None,
            sensor: None,
            _save_interval: GameView::create_save_interval(ctx),
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        use Msg::*;

        match msg {
            Move(direction) => {
                let outcome = self.session.move_by(direction);
                self.apply_regenerate(outcome);
                true
            }
            ToggleSensor => {
                if self.sensor.take().is_none() {
                    self.sensor = SensorWatch::start(ctx.link().callback(SensorPosition));
                }
                true
            }
            SensorPosition(point) => {
                let previous = self.session.player_cell();
                let outcome = self.session.follow_sensor(point);
                self.apply_regenerate(outcome) || self.session.player_cell() != previous
            }
            SelectCache(cell) => {
                if self.selected != cell {
                    self.selected = cell;
                    true
                } else {
                    false
                }
            }
            Take(cell) => self.session.take_coin(cell).has_update(),
            Deposit(cell) => self.session.deposit_coin(cell).has_update(),
            Reset => {
                if gloo::dialogs::confirm("Are you sure you want to reset the game? All progress is lost.") {
                    self.selected = None;
                    let outcome = self.session.reset();
                    self.apply_regenerate(outcome);
                    true
                } else {
                    false
                }
            }
            SaveTick => {
                if let Err(err) = self.session.save() {
                    log::error!("Could not save game: {}", err);
                }
                false
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        use Msg::*;
        use game::Direction::*;

        let n = self.session.config().neighborhood_size;
        let center = self.session.player_cell();
        let trail = trail_cells(&self.session);
        let sensor_class = classes!(self.sensor.is_some().then_some("active"));
        let cb_sensor = ctx.link().callback(|_: MouseEvent| ToggleSensor);
        let cb_reset = ctx.link().callback(|_: MouseEvent| Reset);
        let cb_tile = ctx.link().callback(|msg: Msg| msg);
        let cb_move = |direction: game::Direction| ctx.link().callback(move |_: MouseEvent| Move(direction));

        html! {
            <div class="geocoin">
                <nav>
                    <button id="sensor" class={sensor_class} onclick={cb_sensor}>{"🌐"}</button>
                    <button id="north" onclick={cb_move(North)}>{"⬆️"}</button>
                    <button id="south" onclick={cb_move(South)}>{"⬇️"}</button>
                    <button id="west" onclick={cb_move(West)}>{"⬅️"}</button>
                    <button id="east" onclick={cb_move(East)}>{"➡️"}</button>
                    <button id="reset" onclick={cb_reset}>{"🚮"}</button>
                </nav>
                <div id="statusPanel">{self.session.status_text()}</div>
                <table class="map">
                    {
                        for (-n..n).rev().map(|di| html! {
                            <tr>
                                {
                                    for (-n..n).map(|dj| {
                                        let cell = center.offset(di, dj);
                                        let state = tile_state_at(&self.session, &trail, cell);
                                        let title = AttrValue::from(bounds_title(self.session.bounds_for_cell(cell)));
                                        let callback = cb_tile.clone();
                                        html! {
                                            <TileView {cell} {state} {title} {callback}/>
                                        }
                                    })
                                }
                            </tr>
                        })
                    }
                </table>
                {self.view_popup(ctx)}
            </div>
        }
    }
}
