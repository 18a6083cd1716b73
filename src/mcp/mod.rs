//! MCP (Model Context Protocol) server for assistant integration.
//!
//! Exposes tools: audit_listing, list_marketplaces, describe_marketplace.

use crate::analyzer::{AuditEngine, ScoreCalculator};
use crate::marketplace::ProfileRegistry;
use crate::ListingRequest;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::io::{BufRead, BufReader, Write};

/// MCP JSON-RPC request
#[derive(Debug, Deserialize, Serialize)]
pub struct JsonRpcRequest {
    #[allow(dead_code)]
    pub jsonrpc: Option<String>,
    pub id: Option<serde_json::Value>,
    pub method: String,
    pub params: Option<serde_json::Value>,
}

/// MCP JSON-RPC response
#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: &'static str,
    pub id: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

#[derive(Debug, Serialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
}

/// Tool definition for MCP tools/list
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ToolDef {
    name: &'static str,
    description: &'static str,
    input_schema: InputSchema,
}

#[derive(Debug, Serialize)]
struct InputSchema {
    #[serde(rename = "type")]
    typ: &'static str,
    properties: serde_json::Value,
    required: Vec<&'static str>,
}

fn tool_defs() -> Vec<ToolDef> {
    vec![
        ToolDef {
            name: "audit_listing",
            description: "Audit a listing against a marketplace and return its score, breakdown and diagnostics",
            input_schema: InputSchema {
                typ: "object",
                properties: serde_json::json!({
                    "marketplace": { "type": "string", "description": "Marketplace id (e.g. amazon, ebay); falls back to listing.marketplace" },
                    "listing": { "type": "object", "description": "Listing content: title, bullets, description, backend_keywords, extensions" }
                }),
                required: vec!["listing"],
            },
        },
        ToolDef {
            name: "list_marketplaces",
            description: "List the enabled marketplace ids",
            input_schema: InputSchema {
                typ: "object",
                properties: serde_json::json!({}),
                required: vec![],
            },
        },
        ToolDef {
            name: "describe_marketplace",
            description: "Return a marketplace's field shape, scoring weights and restricted claims",
            input_schema: InputSchema {
                typ: "object",
                properties: serde_json::json!({
                    "marketplace": { "type": "string", "description": "Marketplace id" }
                }),
                required: vec!["marketplace"],
            },
        },
    ]
}

/// Handle a single JSON-RPC request and return a response.
pub fn handle_request(registry: &ProfileRegistry, req: &JsonRpcRequest) -> JsonRpcResponse {
    let id = req.id.clone();
    let result = match req.method.as_str() {
        "initialize" => Some(serde_json::json!({
            "protocolVersion": "0.1.0",
            "capabilities": { "tools": {} },
            "serverInfo": { "name": "listing-qa", "version": env!("CARGO_PKG_VERSION") }
        })),
        "tools/list" => Some(serde_json::json!({ "tools": tool_defs() })),
        "tools/call" => {
            let (name, args) = req
                .params
                .as_ref()
                .and_then(|p| p.get("params").or(Some(p)))
                .map(|p| {
                    let name = p.get("name").and_then(|n| n.as_str()).unwrap_or("");
                    let args = p
                        .get("arguments")
                        .and_then(|a| a.as_object())
                        .cloned()
                        .unwrap_or_default();
                    (name, args)
                })
                .unwrap_or(("", serde_json::Map::new()));

            let result = match name {
                "audit_listing" => run_audit(registry, &args),
                "list_marketplaces" => Ok(serde_json::json!({
                    "marketplaces": registry.enabled_marketplace_ids()
                })),
                "describe_marketplace" => run_describe(registry, &args),
                _ => Err(anyhow::anyhow!("Unknown tool: {}", name)),
            };

            match result {
                Ok(val) => Some(serde_json::json!({
                    "content": [{ "type": "text", "text": serde_json::to_string(&val).unwrap_or_else(|_| "{}".to_string()) }]
                })),
                Err(e) => Some(serde_json::json!({
                    "content": [{ "type": "text", "text": format!("Error: {:#}", e) }],
                    "isError": true
                })),
            }
        }
        _ => None,
    };

    JsonRpcResponse {
        jsonrpc: "2.0",
        id,
        result,
        error: None,
    }
}

/// Run the MCP server loop (stdin / stdout).
pub fn run_mcp_server(registry: &ProfileRegistry) -> anyhow::Result<()> {
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    let reader = BufReader::new(stdin.lock());

    for line in reader.lines() {
        let line = line?;
        if line.is_empty() {
            continue;
        }
        let req: JsonRpcRequest = match serde_json::from_str(&line) {
            Ok(r) => r,
            Err(e) => {
                log::warn!("Ignoring malformed MCP request: {}", e);
                continue;
            }
        };

        log::debug!("MCP request: {}", req.method);
        let response = handle_request(registry, &req);
        writeln!(stdout, "{}", serde_json::to_string(&response)?)?;
        stdout.flush()?;
    }
    Ok(())
}

fn marketplace_arg(args: &serde_json::Map<String, serde_json::Value>) -> Option<&str> {
    args.get("marketplace")
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn run_audit(
    registry: &ProfileRegistry,
    args: &serde_json::Map<String, serde_json::Value>,
) -> anyhow::Result<serde_json::Value> {
    let listing = args
        .get("listing")
        .cloned()
        .context("Missing required argument: listing")?;
    let request: ListingRequest =
        serde_json::from_value(listing).context("Listing is not a valid listing object")?;

    let marketplace = marketplace_arg(args)
        .map(str::to_string)
        .or(request.marketplace)
        .context("No marketplace given in arguments or listing")?;

    let profile = registry.get_marketplace_profile(&marketplace)?;
    let result = AuditEngine::new(registry).analyze_listing(&request.content, &marketplace)?;
    let recommendations = ScoreCalculator::recommendations(&result, profile);

    Ok(serde_json::json!({
        "marketplace": result.marketplace,
        "score": result.score,
        "grade": result.grade().to_string(),
        "validation": result.validation,
        "breakdown": result.breakdown,
        "recommendations": recommendations,
    }))
}

fn run_describe(
    registry: &ProfileRegistry,
    args: &serde_json::Map<String, serde_json::Value>,
) -> anyhow::Result<serde_json::Value> {
    let marketplace = marketplace_arg(args).context("Missing required argument: marketplace")?;
    let profile = registry.get_marketplace_profile(marketplace)?;
    Ok(serde_json::to_value(profile)?)
}
