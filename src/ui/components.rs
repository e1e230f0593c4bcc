/// Reusable UI components for the results view

use crate::comment::{Prediction, Sentiment, Statistics};
use crate::report::{PREVIEW_CHARS, SentimentFilter, chart_gradient, format_confidence, truncate_text};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct StatCardProps {
    pub sentiment: Sentiment,
    pub title: AttrValue,
    pub percentage: f64,
    pub count: usize,
}

#[function_component(StatCard)]
pub fn stat_card(props: &StatCardProps) -> Html {
    html! {
        <div class={classes!("stat-card", props.sentiment.css_class())}>
            <span class="stat-emoji">{props.sentiment.emoji()}</span>
            <span class="stat-percent">{format!("{}%", props.percentage)}</span>
            <span class="stat-count">{props.count}</span>
            <span class="stat-title">{props.title.clone()}</span>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct SentimentChartProps {
    pub statistics: Statistics,
}

/// Doughnut chart drawn with a CSS conic-gradient
#[function_component(SentimentChart)]
pub fn sentiment_chart(props: &SentimentChartProps) -> Html {
    let style = format!("background: {};", chart_gradient(&props.statistics));
    let average = props
        .statistics
        .average_confidence
        .map(format_confidence)
        .unwrap_or_default();

    html! {
        <div class="chart-container">
            <div class="doughnut" style={style}>
                <div class="doughnut-hole">
                    <span class="doughnut-label">{average}</span>
                </div>
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct FilterBarProps {
    pub active: SentimentFilter,
    pub on_select: Callback<SentimentFilter>,
}

#[function_component(FilterBar)]
pub fn filter_bar(props: &FilterBarProps) -> Html {
    html! {
        <div class="filters">
            {for SentimentFilter::ALL.iter().map(|filter| {
                let filter = *filter;
                let class = if filter == props.active { "filter-btn active" } else { "filter-btn" };
                html! {
                    <button
                        key={filter.label()}
                        class={class}
                        onclick={props.on_select.reform(move |_| filter)}
                    >
                        {filter.label()}
                    </button>
                }
            })}
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct CommentItemProps {
    pub prediction: Prediction,
}

#[function_component(CommentItem)]
pub fn comment_item(props: &CommentItemProps) -> Html {
    let prediction = &props.prediction;
    let sentiment = &prediction.sentiment;

    html! {
        <div class={classes!("comment-item", sentiment.css_class())}>
            <div class="comment-header">
                <span class="comment-sentiment">
                    {format!("{} {}", sentiment.emoji(), sentiment.label())}
                </span>
                <span class="comment-confidence">{format_confidence(prediction.confidence)}</span>
            </div>
            <div class="comment-text">{truncate_text(&prediction.text, PREVIEW_CHARS)}</div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct CommentListProps {
    pub predictions: Vec<Prediction>,
}

#[function_component(CommentList)]
pub fn comment_list(props: &CommentListProps) -> Html {
    if props.predictions.is_empty() {
        return html! {
            <div class="comments-list">
                <p class="empty-state">{"No comments in this category"}</p>
            </div>
        };
    }

    html! {
        <div class="comments-list">
            {for props.predictions.iter().map(|prediction| html! {
                <CommentItem prediction={prediction.clone()} />
            })}
        </div>
    }
}
