//! Overlay panels around the canvas: controls, stats and legend.

use leptos::prelude::*;

use super::controller::{GraphStats, TypeFilter};
use super::style::{LEGEND_NODE_TYPES, edge_style, node_color};
use super::types::{NodeType, Relation};

/// Search box, type filter and the reset button.
#[component]
pub fn GraphPanel(
	/// Current search input.
	#[prop(into)]
	search_term: Signal<String>,
	/// Current type filter.
	#[prop(into)]
	filter: Signal<TypeFilter>,
	/// Called on every keystroke in the search box.
	on_search: Callback<String>,
	/// Called when another type is picked.
	on_filter: Callback<TypeFilter>,
	/// Called by the Reset View button.
	on_reset: Callback<()>,
) -> impl IntoView {
	let options = NodeType::FILTERABLE
		.iter()
		.map(|ty| {
			let value = ty.as_str().to_string();
			view! { <option value=value.clone()>{ty.menu_label().to_string()}</option> }
		})
		.collect_view();

	view! {
		<div class="graph-panel">
			<input
				type="text"
				placeholder="Search nodes..."
				prop:value=move || search_term.get()
				on:input=move |ev| on_search.run(event_target_value(&ev))
			/>
			<select
				prop:value=move || filter.get().as_str().to_string()
				on:change=move |ev| on_filter.run(TypeFilter::from(event_target_value(&ev).as_str()))
			>
				<option value="all">"All"</option>
				{options}
			</select>
			<button on:click=move |_| on_reset.run(())>"Reset View"</button>
		</div>
	}
}

/// Counts for the currently visible subgraph.
#[component]
pub fn StatsPanel(
	/// Counts to show.
	#[prop(into)]
	stats: Signal<GraphStats>,
) -> impl IntoView {
	view! {
		<div class="stats-panel">
			<h3>"Graph Statistics"</h3>
			<p>"Nodes: " {move || stats.get().total_nodes}</p>
			<p>"Edges: " {move || stats.get().total_edges}</p>
			<ul>
				{move || {
					stats
						.get()
						.by_type
						.into_iter()
						.map(|(ty, count)| {
							view! {
								<li>
									<span class="swatch" style:background-color=node_color(&ty)></span>
									{format!("{}: {}", ty, count)}
								</li>
							}
						})
						.collect_view()
				}}
			</ul>
		</div>
	}
}

#[component]
fn LegendItem(node_type: NodeType) -> impl IntoView {
	view! {
		<li>
			<span class="swatch" style:background-color=node_color(&node_type)></span>
			{node_type.menu_label().to_string()}
		</li>
	}
}

#[component]
fn LegendEdge(relation: Relation) -> impl IntoView {
	let style = edge_style(&relation);
	let line = match style.dash {
		Some(_) => "dashed",
		None => "solid",
	};
	view! {
		<li>
			<span
				class="edge-swatch"
				style:border-top=format!("{}px {} {}", style.width, line, style.stroke)
			></span>
			{relation.caption()}
		</li>
	}
}

/// Node colours and edge styles.
#[component]
pub fn LegendPanel() -> impl IntoView {
	view! {
		<div class="legend-panel">
			<h3>"Legend"</h3>
			<ul>
				{LEGEND_NODE_TYPES.into_iter().map(|ty| view! { <LegendItem node_type=ty /> }).collect_view()}
			</ul>
			<ul>
				{Relation::STYLED.into_iter().map(|rel| view! { <LegendEdge relation=rel /> }).collect_view()}
			</ul>
		</div>
	}
}
