//! multipart/form-data Body Builder
//!
//! Assembles an ordered list of named parameters into the exact byte layout
//! the Cloud Print endpoints accept. Every request gets its own boundary.
//!
//! Names, file names and MIME types are written verbatim: they are not
//! quoted or escaped, so callers must not pass values containing `"` or CRLF.

use chrono::Utc;

/// Line terminator mandated by RFC 7578.
const CRLF: &str = "\r\n";

/// Fixed part of every generated boundary.
pub const BOUNDARY_PREFIX: &str = "----CloudPrintFormBoundary-";

/// MIME type used for file parameters that do not set one.
pub const DEFAULT_FILE_MIME_TYPE: &str = "text/plain";

/// Kind of a form parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamKind {
    /// Plain text field
    Field,
    /// File attachment, sent with `Content-Transfer-Encoding: base64`
    File { file_name: String, mime_type: String },
}

/// One named multipart parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormParameter {
    pub name: String,
    pub value: String,
    pub kind: ParamKind,
}

impl FormParameter {
    /// A plain text field.
    pub fn field(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            kind: ParamKind::Field,
        }
    }

    /// A file attachment. `value` is the already-encoded (base64 or raw) content.
    pub fn file(
        name: impl Into<String>,
        file_name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            kind: ParamKind::File {
                file_name: file_name.into(),
                mime_type: DEFAULT_FILE_MIME_TYPE.to_string(),
            },
        }
    }

    /// Override the MIME type of a file parameter. No effect on fields.
    pub fn with_mime_type(mut self, mime: impl Into<String>) -> Self {
        if let ParamKind::File { mime_type, .. } = &mut self.kind {
            *mime_type = mime.into();
        }
        self
    }

    fn write_to(&self, boundary: &str, out: &mut String) {
        out.push_str("--");
        out.push_str(boundary);
        out.push_str(CRLF);

        match &self.kind {
            ParamKind::Field => {
                out.push_str(&format!(
                    "Content-Disposition: form-data; name=\"{}\"",
                    self.name
                ));
                out.push_str(CRLF);
            }
            ParamKind::File {
                file_name,
                mime_type,
            } => {
                out.push_str(&format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"",
                    self.name, file_name
                ));
                out.push_str(CRLF);
                out.push_str("Content-Type: ");
                out.push_str(mime_type);
                out.push_str(CRLF);
                out.push_str("Content-Transfer-Encoding: base64");
                out.push_str(CRLF);
            }
        }

        out.push_str(CRLF);
        out.push_str(&self.value);
        out.push_str(CRLF);
    }
}

/// Encoded request body together with the boundary it was framed with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartBody {
    pub boundary: String,
    pub bytes: Vec<u8>,
}

impl MultipartBody {
    /// Value for the outer request's `Content-Type` header.
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }
}

/// Ordered parameter set plus the boundary that frames it.
#[derive(Debug, Clone)]
pub struct MultipartForm {
    boundary: String,
    params: Vec<FormParameter>,
    /// Set when the caller chose the boundary; it is then never rotated.
    fixed_boundary: bool,
}

impl Default for MultipartForm {
    fn default() -> Self {
        Self::new()
    }
}

impl MultipartForm {
    /// Empty form with a freshly generated boundary.
    pub fn new() -> Self {
        Self {
            boundary: generate_boundary(),
            params: Vec::new(),
            fixed_boundary: false,
        }
    }

    /// Empty form framed with `boundary` exactly as given.
    pub fn with_boundary(boundary: impl Into<String>) -> Self {
        Self {
            boundary: boundary.into(),
            params: Vec::new(),
            fixed_boundary: true,
        }
    }

    /// Append a parameter. Parameters are emitted in insertion order.
    pub fn push(&mut self, param: FormParameter) {
        let collides = !self.fixed_boundary && param.value.contains(&self.boundary);
        self.params.push(param);
        if collides {
            self.rotate_boundary();
        }
    }

    /// Builder-style [`push`](Self::push).
    pub fn param(mut self, param: FormParameter) -> Self {
        self.push(param);
        self
    }

    /// Shorthand for pushing a plain text field.
    pub fn field(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.param(FormParameter::field(name, value))
    }

    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    pub fn params(&self) -> &[FormParameter] {
        &self.params
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Render the body. Pure: the same parameters and boundary always
    /// produce the same bytes.
    pub fn build(&self) -> MultipartBody {
        let mut out = String::new();
        for param in &self.params {
            param.write_to(&self.boundary, &mut out);
        }

        out.push_str("--");
        out.push_str(&self.boundary);
        out.push_str("--");
        out.push_str(CRLF);

        MultipartBody {
            boundary: self.boundary.clone(),
            bytes: out.into_bytes(),
        }
    }

    fn rotate_boundary(&mut self) {
        loop {
            let candidate = generate_boundary();
            if !self.params.iter().any(|p| p.value.contains(&candidate)) {
                self.boundary = candidate;
                return;
            }
        }
    }
}

/// Prefix + nanosecond UTC timestamp + 32 random bits.
fn generate_boundary() -> String {
    let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();
    let salt: [u8; 4] = rand::random();
    format!("{}{}{}", BOUNDARY_PREFIX, nanos, hex::encode(salt))
}
