//! Vega-Lite payloads for generated views.
//!
//! Every payload carries its data inline (`data.values`) so the renderer
//! needs nothing but the document.

use crate::utils::number_json;
use serde_json::{Map, Value, json};

pub const VEGA_LITE_SCHEMA: &str = "https://vega.github.io/schema/vega-lite/v5.json";

/// Field names used by the numeric breakdown payload.
const MEASURE_FIELD: &str = "measure";
const TOTAL_FIELD: &str = "total";

/// Escape a column name for use as a Vega-Lite field reference.
///
/// Dots and brackets would otherwise be read as nested-field access.
pub fn field_ref(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for ch in name.chars() {
        if matches!(ch, '.' | '[' | ']' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

fn record(label_field: &str, label: &str, value_field: &str, value: f64) -> Value {
    let mut row = Map::new();
    row.insert(label_field.to_string(), json!(label));
    row.insert(value_field.to_string(), number_json(value));
    Value::Object(row)
}

/// Vertical bars of summed values per category.
pub fn category_bars(category: &str, measure: &str, groups: &[(String, f64)]) -> Value {
    let values: Vec<Value> = groups
        .iter()
        .map(|(label, total)| record(category, label, measure, *total))
        .collect();

    json!({
        "$schema": VEGA_LITE_SCHEMA,
        "width": "container",
        "data": { "values": values },
        "mark": { "type": "bar", "tooltip": true },
        "encoding": {
            "x": { "field": field_ref(category), "type": "nominal", "sort": null, "title": category },
            "y": { "field": field_ref(measure), "type": "quantitative", "title": measure }
        }
    })
}

/// Mark used for the temporal trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendMark {
    Line,
    Area,
}

/// Summed values over time.
pub fn time_series(
    temporal: &str,
    measure: &str,
    points: &[(String, f64)],
    mark: TrendMark,
) -> Value {
    let values: Vec<Value> = points
        .iter()
        .map(|(label, total)| record(temporal, label, measure, *total))
        .collect();

    let mark = match mark {
        TrendMark::Line => json!({ "type": "line", "point": true, "tooltip": true }),
        TrendMark::Area => json!({ "type": "area", "line": true, "tooltip": true }),
    };

    json!({
        "$schema": VEGA_LITE_SCHEMA,
        "width": "container",
        "data": { "values": values },
        "mark": mark,
        "encoding": {
            "x": { "field": field_ref(temporal), "type": "temporal", "title": temporal },
            "y": { "field": field_ref(measure), "type": "quantitative", "title": measure }
        }
    })
}

/// Share of each numeric column's total.
pub fn numeric_breakdown(totals: &[(String, f64)], donut: bool) -> Value {
    let values: Vec<Value> = totals
        .iter()
        .map(|(name, total)| record(MEASURE_FIELD, name, TOTAL_FIELD, *total))
        .collect();

    let mut mark = json!({ "type": "arc", "tooltip": true });
    if donut {
        mark["innerRadius"] = json!(50);
    }

    json!({
        "$schema": VEGA_LITE_SCHEMA,
        "data": { "values": values },
        "mark": mark,
        "encoding": {
            "theta": { "field": TOTAL_FIELD, "type": "quantitative" },
            "color": { "field": MEASURE_FIELD, "type": "nominal", "sort": null }
        }
    })
}

/// One point per row with both measures present.
pub fn scatter(x: &str, y: &str, pairs: &[(f64, f64)]) -> Value {
    let values: Vec<Value> = pairs
        .iter()
        .map(|(xv, yv)| {
            let mut row = Map::new();
            row.insert(x.to_string(), number_json(*xv));
            row.insert(y.to_string(), number_json(*yv));
            Value::Object(row)
        })
        .collect();

    json!({
        "$schema": VEGA_LITE_SCHEMA,
        "width": "container",
        "data": { "values": values },
        "mark": { "type": "point", "tooltip": true },
        "encoding": {
            "x": { "field": field_ref(x), "type": "quantitative", "title": x },
            "y": { "field": field_ref(y), "type": "quantitative", "title": y }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_ref_escapes_nested_access() {
        assert_eq!(field_ref("revenue"), "revenue");
        assert_eq!(field_ref("price.usd"), "price\\.usd");
        assert_eq!(field_ref("a[0]"), "a\\[0\\]");
    }

    #[test]
    fn test_category_bars_payload() {
        let spec = category_bars("region", "sales", &[("North".into(), 30.0), ("South".into(), 12.5)]);
        assert_eq!(spec["mark"]["type"], "bar");
        assert_eq!(spec["encoding"]["x"]["field"], "region");
        assert_eq!(
            spec["data"]["values"],
            json!([{"region": "North", "sales": 30}, {"region": "South", "sales": 12.5}])
        );
    }

    #[test]
    fn test_time_series_marks() {
        let points = vec![("2024-01-01".to_string(), 1.0)];
        let line = time_series("day", "sales", &points, TrendMark::Line);
        let area = time_series("day", "sales", &points, TrendMark::Area);
        assert_eq!(line["mark"]["type"], "line");
        assert_eq!(area["mark"]["type"], "area");
        assert_eq!(line["encoding"]["x"]["type"], "temporal");
    }

    #[test]
    fn test_numeric_breakdown_donut() {
        let totals = vec![("sales".to_string(), 10.0), ("units".to_string(), 4.0)];
        let pie = numeric_breakdown(&totals, false);
        let donut = numeric_breakdown(&totals, true);
        assert!(pie["mark"].get("innerRadius").is_none());
        assert_eq!(donut["mark"]["innerRadius"], 50);
        assert_eq!(pie["data"]["values"][1], json!({"measure": "units", "total": 4}));
    }
}
