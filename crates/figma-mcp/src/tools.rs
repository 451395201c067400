use serde::{Deserialize, Serialize};
use serde_json::Value;

use figma_core::error::Error;
use figma_core::types::{
    GetComments, GetFile, GetFileNodes, GetImage, GetImageFills, ImageFormat, ToolRequest,
};

use crate::args::Arguments;

/// Definition of an MCP tool as advertised by `tools/list`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

type ParseFn = fn(&Arguments<'_>) -> Result<ToolRequest, Error>;

/// One row of the tool table: what is advertised, and how its arguments
/// turn into a typed request.
pub struct ToolSpec {
    pub name: &'static str,
    description: &'static str,
    schema: fn() -> Value,
    parse: ParseFn,
}

impl ToolSpec {
    #[must_use]
    pub fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name.to_string(),
            description: self.description.to_string(),
            input_schema: (self.schema)(),
        }
    }

    /// Validate raw arguments into a typed request for this tool.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] describing the first violated constraint.
    pub fn parse(&self, arguments: &Value) -> Result<ToolRequest, Error> {
        let args = Arguments::new(self.name, arguments)?;
        (self.parse)(&args)
    }
}

const FORMATS: [&str; 4] = ["png", "jpg", "svg", "pdf"];

static TOOLS: [ToolSpec; 5] = [
    ToolSpec {
        name: "get_file",
        description: "Retrieve the entire Figma file JSON. Use with caution for large files.",
        schema: get_file_schema,
        parse: parse_get_file,
    },
    ToolSpec {
        name: "get_node",
        description: "Retrieve a specific node from a Figma file.",
        schema: get_node_schema,
        parse: parse_get_node,
    },
    ToolSpec {
        name: "get_image",
        description: "Render a node as an image.",
        schema: get_image_schema,
        parse: parse_get_image,
    },
    ToolSpec {
        name: "get_image_fills",
        description: "Get image URLs for image fills in a file.",
        schema: file_key_only_schema,
        parse: parse_get_image_fills,
    },
    ToolSpec {
        name: "get_comments",
        description: "Retrieve comments from a Figma file.",
        schema: file_key_only_schema,
        parse: parse_get_comments,
    },
];

/// Registry of the Figma tools exposed over MCP.
pub struct ToolRegistry;

impl ToolRegistry {
    /// Return the list of tool definitions for the MCP `tools/list` method,
    /// in their fixed order.
    #[must_use]
    pub fn definitions() -> Vec<ToolDefinition> {
        TOOLS.iter().map(ToolSpec::definition).collect()
    }

    /// Look a tool up by exact name.
    #[must_use]
    pub fn find(name: &str) -> Option<&'static ToolSpec> {
        TOOLS.iter().find(|tool| tool.name == name)
    }

    /// Resolve a tool by name and validate its arguments.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownTool`] for names not in the table and
    /// [`Error::Validation`] for arguments that do not fit the schema.
    pub fn parse(name: &str, arguments: &Value) -> Result<ToolRequest, Error> {
        Self::find(name)
            .ok_or_else(|| Error::UnknownTool(name.to_string()))?
            .parse(arguments)
    }
}

fn file_key_property() -> Value {
    serde_json::json!({
        "type": "string",
        "description": "The key of the Figma file"
    })
}

fn depth_property() -> Value {
    serde_json::json!({
        "type": "integer",
        "minimum": 0,
        "description": "Traverse depth (optional, 0 returns the full tree)"
    })
}

fn get_file_schema() -> Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "file_key": file_key_property(),
            "depth": depth_property()
        },
        "required": ["file_key"]
    })
}

fn get_node_schema() -> Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "file_key": file_key_property(),
            "node_id": {
                "type": "string",
                "description": "The ID of the node to retrieve (comma-separate several ids)"
            },
            "depth": depth_property()
        },
        "required": ["file_key", "node_id"]
    })
}

fn get_image_schema() -> Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "file_key": file_key_property(),
            "node_id": {
                "type": "string",
                "description": "The ID of the node to render (comma-separate several ids)"
            },
            "format": {
                "type": "string",
                "enum": FORMATS,
                "default": "png",
                "description": "Image format"
            },
            "scale": {
                "type": "number",
                "minimum": GetImage::MIN_SCALE,
                "maximum": GetImage::MAX_SCALE,
                "default": GetImage::DEFAULT_SCALE,
                "description": "Image scale"
            }
        },
        "required": ["file_key", "node_id"]
    })
}

fn file_key_only_schema() -> Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "file_key": file_key_property()
        },
        "required": ["file_key"]
    })
}

fn parse_get_file(args: &Arguments<'_>) -> Result<ToolRequest, Error> {
    Ok(ToolRequest::GetFile(GetFile {
        file_key: args.required_str("file_key")?.to_string(),
        depth: args.optional_depth("depth")?,
    }))
}

fn parse_get_node(args: &Arguments<'_>) -> Result<ToolRequest, Error> {
    Ok(ToolRequest::GetNode(GetFileNodes {
        file_key: args.required_str("file_key")?.to_string(),
        ids: args.required_ids("node_id")?,
        depth: args.optional_depth("depth")?,
    }))
}

fn parse_get_image(args: &Arguments<'_>) -> Result<ToolRequest, Error> {
    let file_key = args.required_str("file_key")?.to_string();
    let ids = args.required_ids("node_id")?;
    let format = args
        .optional_enum::<ImageFormat>("format", &FORMATS)?
        .unwrap_or_default();
    let scale = args
        .optional_number("scale")?
        .unwrap_or(GetImage::DEFAULT_SCALE);
    if !(GetImage::MIN_SCALE..=GetImage::MAX_SCALE).contains(&scale) {
        return Err(Error::validation(format!(
            "Invalid arguments for get_image: field 'scale' must be between {} and {}",
            GetImage::MIN_SCALE,
            GetImage::MAX_SCALE
        )));
    }

    Ok(ToolRequest::GetImage(GetImage {
        file_key,
        ids,
        format,
        scale,
    }))
}

fn parse_get_image_fills(args: &Arguments<'_>) -> Result<ToolRequest, Error> {
    Ok(ToolRequest::GetImageFills(GetImageFills {
        file_key: args.required_str("file_key")?.to_string(),
    }))
}

fn parse_get_comments(args: &Arguments<'_>) -> Result<ToolRequest, Error> {
    Ok(ToolRequest::GetComments(GetComments {
        file_key: args.required_str("file_key")?.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn all_tools_defined_in_order() {
        let tools = ToolRegistry::definitions();
        let names: Vec<&str> = tools.iter().map(|t| t.name.as_str()).collect();

        assert_eq!(
            names,
            vec![
                "get_file",
                "get_node",
                "get_image",
                "get_image_fills",
                "get_comments"
            ]
        );
    }

    #[test]
    fn tools_serialize() {
        let tools = ToolRegistry::definitions();
        let json = serde_json::to_string(&tools).unwrap();
        assert!(json.contains("get_image_fills"));
        assert!(json.contains("inputSchema"));
    }

    #[test]
    fn get_node_has_required_params() {
        let tools = ToolRegistry::definitions();
        let node = tools.iter().find(|t| t.name == "get_node").unwrap();
        let required = node.input_schema["required"].as_array().unwrap();

        let required_names: Vec<&str> = required.iter().filter_map(Value::as_str).collect();
        assert_eq!(required_names, vec!["file_key", "node_id"]);
    }

    #[test]
    fn get_image_advertises_formats() {
        let tool = ToolRegistry::find("get_image").unwrap().definition();
        assert_eq!(
            tool.input_schema["properties"]["format"]["enum"],
            json!(["png", "jpg", "svg", "pdf"])
        );
    }

    #[test]
    fn unknown_tool() {
        let err = ToolRegistry::parse("delete_file", &json!({})).unwrap_err();
        assert!(matches!(err, Error::UnknownTool(name) if name == "delete_file"));
    }

    #[test]
    fn parse_get_node_ignores_unknown_fields() {
        let req = ToolRegistry::parse(
            "get_node",
            &json!({ "file_key": "F", "node_id": "1:2", "colour": "blue" }),
        )
        .unwrap();

        assert_eq!(
            req,
            ToolRequest::GetNode(GetFileNodes {
                file_key: "F".to_string(),
                ids: vec!["1:2".to_string()],
                depth: None,
            })
        );
    }

    #[test]
    fn parse_get_image_defaults() {
        let req =
            ToolRegistry::parse("get_image", &json!({ "file_key": "F", "node_id": "1:2" }))
                .unwrap();

        let ToolRequest::GetImage(image) = req else {
            panic!("expected get_image request");
        };
        assert_eq!(image.format, ImageFormat::Png);
        assert!((image.scale - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn parse_get_image_rejects_scale_out_of_range() {
        let err = ToolRegistry::parse(
            "get_image",
            &json!({ "file_key": "F", "node_id": "1:2", "scale": 10 }),
        )
        .unwrap_err();
        assert!(err.to_string().contains("'scale'"));
    }

    #[test]
    fn parse_get_file_with_depth() {
        let req =
            ToolRegistry::parse("get_file", &json!({ "file_key": "F", "depth": 3 })).unwrap();
        assert_eq!(
            req,
            ToolRequest::GetFile(GetFile {
                file_key: "F".to_string(),
                depth: Some(3),
            })
        );
    }

    #[test]
    fn zero_depth_means_full_tree() {
        let req = ToolRegistry::parse(
            "get_node",
            &json!({ "file_key": "F", "node_id": "1:2", "depth": 0 }),
        )
        .unwrap();
        assert_eq!(
            req,
            ToolRequest::GetNode(GetFileNodes {
                file_key: "F".to_string(),
                ids: vec!["1:2".to_string()],
                depth: None,
            })
        );
    }
}
