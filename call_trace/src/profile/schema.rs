use serde::{Deserialize, Serialize};

/// Trace capture emitted by an instrumented run: the instrumented file's
/// path, the function table (slot 0 is the empty sentinel, every other entry
/// is `<name>_<line>_<column>`), the flat signed event stream, and, in timing
/// mode, one monotonic millisecond reading per event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceCapture {
    pub file: String,
    pub fns: Vec<String>,
    pub t: Vec<i64>,
    #[serde(default)]
    pub d: Option<Vec<f64>>,
}

/// One node of the reconstructed call tree, serialized in the Chrome
/// DevTools CPUProfileNode shape.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CpuProfileNode {
    pub function_name: String,
    pub script_id: String,
    pub url: String,
    pub line_number: u32,
    pub column_number: u32,
    pub hit_count: u32,
    #[serde(rename = "callUID")]
    pub call_uid: u64,
    pub children: Vec<CpuProfileNode>,
    pub deopt_reason: String,
    pub id: u32,
    pub position_ticks: Vec<serde_json::Value>,
}

/// Chrome DevTools CPUProfile: `startTime`/`endTime` in seconds, `samples`
/// as node ids in emission order, `timestamps` in integer microseconds
/// aligned 1:1 with `samples`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CpuProfile {
    pub head: CpuProfileNode,
    pub start_time: f64,
    pub end_time: f64,
    pub samples: Vec<u32>,
    pub timestamps: Vec<u64>,
}
