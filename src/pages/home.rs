use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_query_map;
use log::{info, warn};

use crate::components::knowledge_graph::{
	ExplorerAction, ExplorerConfig, ExtractionClient, GraphExplorer, GraphPanel, GraphScene,
	GraphStats, KnowledgeGraphCanvas, LegendPanel, NodeId, RequestTracker, StatsPanel, TypeFilter,
};

/// What the area below the form shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Screen {
	Prompt,
	Processing,
	NoData,
	Graph,
}

/// Both submit paths (form and `?text=`) go through this.
fn should_submit(input: &str, loading: bool) -> bool {
	!loading && !input.trim().is_empty()
}

/// Explorer page: submit text, then browse the extracted graph.
#[component]
pub fn Home() -> impl IntoView {
	let config = ExplorerConfig::from_env();
	let client = StoredValue::new(ExtractionClient::new(&config.endpoint));
	let layout = config.layout;
	let tracker = StoredValue::new(RequestTracker::default());

	let text = RwSignal::new(String::new());
	let loading = RwSignal::new(false);
	let error = RwSignal::new(None::<String>);
	let explorer = RwSignal::new(None::<GraphExplorer>);

	let submit = move |input: String| {
		if !should_submit(&input, loading.get_untracked()) {
			return;
		}
		let ticket = tracker.with_value(RequestTracker::begin);
		let (client, tracker) = (client.get_value(), tracker.get_value());
		loading.set(true);
		error.set(None);

		spawn_local(async move {
			let result = client.extract(&input).await;
			if !tracker.is_current(ticket) {
				info!("discarding stale response #{}", ticket.generation());
				return;
			}
			loading.set(false);
			match result {
				Ok(response) => {
					explorer.set(Some(GraphExplorer::new(&response, ticket.generation(), layout)));
				}
				Err(e) => {
					warn!("extraction failed: {}", e);
					error.set(Some(e.to_string()));
				}
			}
		});
	};

	// `?text=...` pre-fills the form and submits it
	let query = use_query_map();
	Effect::new(move |_| {
		if let Some(initial) = query.with(|q| q.get("text")) {
			text.set(initial.clone());
			submit(initial);
		}
	});

	let dispatch = move |action: ExplorerAction| {
		explorer.update(|slot| {
			if let Some(session) = slot.as_mut() {
				session.apply(action);
			}
		});
	};

	let screen = Memo::new(move |_| {
		explorer.with(|slot| match slot {
			Some(session) if session.is_empty() => Screen::NoData,
			Some(_) => Screen::Graph,
			None if loading.get() => Screen::Processing,
			None => Screen::Prompt,
		})
	});

	let scene = Signal::derive(move || {
		explorer.with(|slot| slot.as_ref().map(GraphExplorer::scene).unwrap_or_else(GraphScene::default))
	});
	let stats = Signal::derive(move || {
		explorer.with(|slot| slot.as_ref().map(GraphExplorer::stats).unwrap_or_else(GraphStats::default))
	});
	let search_term = Signal::derive(move || {
		explorer.with(|slot| {
			slot.as_ref()
				.map(|s| s.state().search_term.clone())
				.unwrap_or_default()
		})
	});
	let filter = Signal::derive(move || {
		explorer.with(|slot| slot.as_ref().map(|s| s.state().filter.clone()).unwrap_or_default())
	});

	let on_node_activated = Callback::new(move |id: NodeId| dispatch(ExplorerAction::NodeClick(id)));
	let on_search = Callback::new(move |term: String| dispatch(ExplorerAction::Search(term)));
	let on_filter = Callback::new(move |f: TypeFilter| dispatch(ExplorerAction::Filter(f)));
	let on_reset = Callback::new(move |_: ()| dispatch(ExplorerAction::Reset));

	let on_submit = move |ev: leptos::ev::SubmitEvent| {
		ev.prevent_default();
		submit(text.get_untracked());
	};

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="explorer">
				<form class="extract-form" on:submit=on_submit>
					<textarea
						rows="6"
						placeholder="Paste a letter or any text..."
						prop:value=move || text.get()
						on:input=move |ev| text.set(event_target_value(&ev))
					></textarea>
					<button type="submit" disabled=move || loading.get()>
						{move || if loading.get() { "Processing..." } else { "Generate Graph" }}
					</button>
				</form>

				{move || error.get().map(|message| view! { <p class="error">{message}</p> })}

				{move || match screen.get() {
					Screen::Prompt => {
						view! { <p class="placeholder">"Enter text above to generate a knowledge graph"</p> }
							.into_any()
					}
					Screen::Processing => view! { <p class="placeholder">"Processing text..."</p> }.into_any(),
					Screen::NoData => view! { <p class="placeholder">"No data available"</p> }.into_any(),
					Screen::Graph => {
						view! {
							<div class="graph-area" style="position: relative; height: 70vh;">
								<KnowledgeGraphCanvas scene=scene on_node_activated=on_node_activated />
								<GraphPanel
									search_term=search_term
									filter=filter
									on_search=on_search
									on_filter=on_filter
									on_reset=on_reset
								/>
								<StatsPanel stats=stats />
								<LegendPanel />
							</div>
						}
							.into_any()
					}
				}}
			</div>
		</ErrorBoundary>
	}
}
