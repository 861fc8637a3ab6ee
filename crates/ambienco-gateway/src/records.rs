//! Typed records stored by the gateway and the request bodies that create
//! them.
//!
//! Every visitor-supplied string passes through the [`Sanitizer`] and is
//! trimmed before it is stored. Request bodies turn into records through
//! `into_*` constructors, which are the only place validation happens.

use ambienco_core::{AmbiencoError, AmbiencoResult, ChatMessage};
use ambienco_security::Sanitizer;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Key prefix for products.
pub const PRODUCT_PREFIX: &str = "product:";
/// Key prefix for forum posts.
pub const FORUM_POST_PREFIX: &str = "forum:post:";
/// Key prefix for contact form submissions.
pub const CONTACT_PREFIX: &str = "contact:";
/// Key prefix for product inquiries.
pub const INQUIRY_PREFIX: &str = "inquiry:";
/// Key prefix for chat transcripts.
pub const CHAT_PREFIX: &str = "chat:";

/// Categories accepted for forum posts.
pub const FORUM_CATEGORIES: [&str; 6] = [
    "General",
    "Product Questions",
    "Installation",
    "Technical Support",
    "Lighting Design",
    "Smart Home",
];

/// Store key of a chat transcript.
pub fn chat_key(session_id: Uuid) -> String {
    format!("{CHAT_PREFIX}{session_id}")
}

fn short_id() -> String {
    Uuid::new_v4().simple().to_string()
}

fn clean(sanitizer: &Sanitizer, field: &str, value: &str) -> AmbiencoResult<String> {
    sanitizer
        .sanitize(value)
        .into_result()
        .map(|s| s.trim().to_string())
        .map_err(|reason| AmbiencoError::Validation(format!("{field}: {reason}")))
}

fn required(sanitizer: &Sanitizer, field: &str, value: &str) -> AmbiencoResult<String> {
    let value = clean(sanitizer, field, value)?;
    if value.is_empty() {
        return Err(AmbiencoError::Validation(format!("{field} is required")));
    }
    Ok(value)
}

fn optional(
    sanitizer: &Sanitizer,
    field: &str,
    value: Option<String>,
) -> AmbiencoResult<Option<String>> {
    match value {
        Some(v) => {
            let v = clean(sanitizer, field, &v)?;
            Ok((!v.is_empty()).then_some(v))
        }
        None => Ok(None),
    }
}

fn email(sanitizer: &Sanitizer, value: &str) -> AmbiencoResult<String> {
    let value = required(sanitizer, "email", value)?;
    let valid = match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !value.contains(char::is_whitespace)
        }
        None => false,
    };
    if !valid {
        return Err(AmbiencoError::Validation(
            "email is not a valid address".to_string(),
        ));
    }
    Ok(value)
}

// --- Products ---

/// Top-level product line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductCategory {
    /// Fixtures, panels, strips.
    Lighting,
    /// Furniture.
    Furniture,
    /// Switches, cabling, accessories.
    Electrical,
}

impl ProductCategory {
    /// Lower-case name, as used in ids and URLs.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductCategory::Lighting => "lighting",
            ProductCategory::Furniture => "furniture",
            ProductCategory::Electrical => "electrical",
        }
    }
}

impl fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductCategory {
    type Err = AmbiencoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lighting" => Ok(ProductCategory::Lighting),
            "furniture" => Ok(ProductCategory::Furniture),
            "electrical" => Ok(ProductCategory::Electrical),
            other => Err(AmbiencoError::Validation(format!(
                "Unknown product category '{other}'"
            ))),
        }
    }
}

/// A catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// `{category}-{uuid}`.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Marketing description.
    pub description: String,
    /// Product line.
    pub category: ProductCategory,
    /// Free-form technical specifications (wattage, lumen, IP rating).
    #[serde(default)]
    pub specifications: HashMap<String, String>,
    /// Bullet-point features.
    #[serde(default)]
    pub features: Vec<String>,
    /// Image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Store key of the product with `id`.
    pub fn key(id: &str) -> String {
        format!("{PRODUCT_PREFIX}{id}")
    }
}

/// Body of `POST /products`.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProduct {
    /// Display name.
    pub name: String,
    /// Marketing description.
    pub description: String,
    /// Product line.
    pub category: ProductCategory,
    /// Technical specifications.
    #[serde(default)]
    pub specifications: HashMap<String, String>,
    /// Bullet-point features.
    #[serde(default)]
    pub features: Vec<String>,
    /// Image URL.
    #[serde(default)]
    pub image: Option<String>,
}

impl NewProduct {
    /// Validate and stamp a fresh product.
    pub fn into_product(self, sanitizer: &Sanitizer) -> AmbiencoResult<Product> {
        let now = Utc::now();
        Ok(Product {
            id: format!("{}-{}", self.category, short_id()),
            name: required(sanitizer, "name", &self.name)?,
            description: required(sanitizer, "description", &self.description)?,
            category: self.category,
            specifications: self.specifications,
            features: self.features,
            image: optional(sanitizer, "image", self.image)?,
            created_at: now,
            updated_at: now,
        })
    }
}

/// Body of `PUT /products/{id}`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductUpdate {
    /// New display name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New product line.
    pub category: Option<ProductCategory>,
    /// Replacement specifications.
    pub specifications: Option<HashMap<String, String>>,
    /// Replacement features.
    pub features: Option<Vec<String>>,
    /// New image URL.
    pub image: Option<String>,
}

impl ProductUpdate {
    /// Merge the present fields into `product` and bump `updated_at`.
    pub fn apply(self, product: &mut Product, sanitizer: &Sanitizer) -> AmbiencoResult<()> {
        if let Some(name) = self.name {
            product.name = required(sanitizer, "name", &name)?;
        }
        if let Some(description) = self.description {
            product.description = required(sanitizer, "description", &description)?;
        }
        if let Some(category) = self.category {
            product.category = category;
        }
        if let Some(specifications) = self.specifications {
            product.specifications = specifications;
        }
        if let Some(features) = self.features {
            product.features = features;
        }
        if self.image.is_some() {
            product.image = optional(sanitizer, "image", self.image)?;
        }
        product.updated_at = Utc::now();
        Ok(())
    }
}

// --- Forum ---

/// A reply under a forum post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForumReply {
    /// `reply-{uuid}`.
    pub id: String,
    /// Reply text.
    pub content: String,
    /// Display name of the author.
    pub author: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// A community forum thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForumPost {
    /// `post-{uuid}`.
    pub id: String,
    /// Thread title.
    pub title: String,
    /// Opening message.
    pub content: String,
    /// Display name of the author.
    pub author: String,
    /// One of [`FORUM_CATEGORIES`].
    pub category: String,
    /// Like counter.
    #[serde(default)]
    pub likes: u32,
    /// Replies, oldest first.
    #[serde(default)]
    pub replies: Vec<ForumReply>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl ForumPost {
    /// Store key of the post with `id`.
    pub fn key(id: &str) -> String {
        format!("{FORUM_POST_PREFIX}{id}")
    }
}

fn default_forum_category() -> String {
    "General".to_string()
}

/// Body of `POST /forum/posts`.
#[derive(Debug, Clone, Deserialize)]
pub struct NewForumPost {
    /// Thread title.
    pub title: String,
    /// Opening message.
    pub content: String,
    /// Display name of the author.
    pub author: String,
    /// Forum category.
    #[serde(default = "default_forum_category")]
    pub category: String,
}

impl NewForumPost {
    /// Validate and stamp a fresh post with no likes and no replies.
    pub fn into_post(self, sanitizer: &Sanitizer) -> AmbiencoResult<ForumPost> {
        let category = required(sanitizer, "category", &self.category)?;
        let category = FORUM_CATEGORIES
            .iter()
            .find(|c| c.eq_ignore_ascii_case(&category))
            .ok_or_else(|| {
                AmbiencoError::Validation(format!("Unknown forum category '{category}'"))
            })?;
        Ok(ForumPost {
            id: format!("post-{}", short_id()),
            title: required(sanitizer, "title", &self.title)?,
            content: required(sanitizer, "content", &self.content)?,
            author: required(sanitizer, "author", &self.author)?,
            category: (*category).to_string(),
            likes: 0,
            replies: Vec::new(),
            created_at: Utc::now(),
        })
    }
}

/// Body of `POST /forum/posts/{id}/replies`.
#[derive(Debug, Clone, Deserialize)]
pub struct NewForumReply {
    /// Reply text.
    pub content: String,
    /// Display name of the author.
    pub author: String,
}

impl NewForumReply {
    /// Validate and stamp a fresh reply.
    pub fn into_reply(self, sanitizer: &Sanitizer) -> AmbiencoResult<ForumReply> {
        Ok(ForumReply {
            id: format!("reply-{}", short_id()),
            content: required(sanitizer, "content", &self.content)?,
            author: required(sanitizer, "author", &self.author)?,
            created_at: Utc::now(),
        })
    }
}

// --- Leads ---

/// Handling state of a contact or inquiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeadStatus {
    /// Not yet looked at.
    #[default]
    New,
    /// Staff got back to the sender.
    Contacted,
    /// Nothing left to do.
    Closed,
}

/// Body of the admin status endpoints for contacts and inquiries.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusUpdate {
    /// New handling state.
    pub status: LeadStatus,
}

/// A contact form submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    /// `contact-{uuid}`.
    pub id: String,
    /// Sender name.
    pub name: String,
    /// Sender email.
    pub email: String,
    /// Sender phone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Sender company.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    /// Subject line.
    pub subject: String,
    /// Message body.
    pub message: String,
    /// Product line the sender is interested in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_interest: Option<String>,
    /// Handling state.
    #[serde(default)]
    pub status: LeadStatus,
    /// Submission time.
    pub created_at: DateTime<Utc>,
}

impl Contact {
    /// Store key of the contact with `id`.
    pub fn key(id: &str) -> String {
        format!("{CONTACT_PREFIX}{id}")
    }
}

/// Body of `POST /contact`.
#[derive(Debug, Clone, Deserialize)]
pub struct NewContact {
    /// Sender name.
    pub name: String,
    /// Sender email.
    pub email: String,
    /// Message body.
    pub message: String,
    /// Sender phone.
    #[serde(default)]
    pub phone: Option<String>,
    /// Sender company.
    #[serde(default)]
    pub company: Option<String>,
    /// Subject line, `General Inquiry` when absent.
    #[serde(default)]
    pub subject: Option<String>,
    /// Product line the sender is interested in.
    #[serde(default)]
    pub product_interest: Option<String>,
}

impl NewContact {
    /// Validate and stamp a fresh contact with status `new`.
    pub fn into_contact(self, sanitizer: &Sanitizer) -> AmbiencoResult<Contact> {
        Ok(Contact {
            id: format!("contact-{}", short_id()),
            name: required(sanitizer, "name", &self.name)?,
            email: email(sanitizer, &self.email)?,
            phone: optional(sanitizer, "phone", self.phone)?,
            company: optional(sanitizer, "company", self.company)?,
            subject: optional(sanitizer, "subject", self.subject)?
                .unwrap_or_else(|| "General Inquiry".to_string()),
            message: required(sanitizer, "message", &self.message)?,
            product_interest: optional(sanitizer, "product_interest", self.product_interest)?,
            status: LeadStatus::New,
            created_at: Utc::now(),
        })
    }
}

/// A request for a quote or details on a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductInquiry {
    /// `inquiry-{uuid}`.
    pub id: String,
    /// Sender name.
    pub name: String,
    /// Sender email.
    pub email: String,
    /// Sender phone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Catalog id of the product asked about.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    /// Name of the product asked about.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    /// Requested quantity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    /// Free-text message.
    #[serde(default)]
    pub message: String,
    /// Handling state.
    #[serde(default)]
    pub status: LeadStatus,
    /// Submission time.
    pub created_at: DateTime<Utc>,
}

impl ProductInquiry {
    /// Store key of the inquiry with `id`.
    pub fn key(id: &str) -> String {
        format!("{INQUIRY_PREFIX}{id}")
    }
}

/// Body of `POST /product-inquiry`.
#[derive(Debug, Clone, Deserialize)]
pub struct NewInquiry {
    /// Sender name.
    pub name: String,
    /// Sender email.
    pub email: String,
    /// Sender phone.
    #[serde(default)]
    pub phone: Option<String>,
    /// Catalog id of the product.
    #[serde(default)]
    pub product_id: Option<String>,
    /// Name of the product.
    #[serde(default)]
    pub product_name: Option<String>,
    /// Requested quantity.
    #[serde(default)]
    pub quantity: Option<u32>,
    /// Free-text message.
    #[serde(default)]
    pub message: String,
}

impl NewInquiry {
    /// Validate and stamp a fresh inquiry with status `new`.
    pub fn into_inquiry(self, sanitizer: &Sanitizer) -> AmbiencoResult<ProductInquiry> {
        Ok(ProductInquiry {
            id: format!("inquiry-{}", short_id()),
            name: required(sanitizer, "name", &self.name)?,
            email: email(sanitizer, &self.email)?,
            phone: optional(sanitizer, "phone", self.phone)?,
            product_id: optional(sanitizer, "product_id", self.product_id)?,
            product_name: optional(sanitizer, "product_name", self.product_name)?,
            quantity: self.quantity,
            message: clean(sanitizer, "message", &self.message)?,
            status: LeadStatus::New,
            created_at: Utc::now(),
        })
    }
}

// --- Chat ---

/// Body of `POST /assistant/ask`.
#[derive(Debug, Clone, Deserialize)]
pub struct AskRequest {
    /// Existing session; a new one is started when absent.
    #[serde(default)]
    pub session_id: Option<Uuid>,
    /// The visitor's question.
    pub message: String,
}

/// Body of `POST /chat/conversation`.
#[derive(Debug, Clone, Deserialize)]
pub struct SaveConversation {
    /// Session to upsert; a new one is started when absent.
    #[serde(default)]
    pub session_id: Option<Uuid>,
    /// Full widget history.
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    /// Client information merged into the stored transcript.
    #[serde(default)]
    pub user_info: HashMap<String, serde_json::Value>,
}

/// Body of `POST /chat/conversation/{session_id}/feedback`.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedbackRequest {
    /// The assistant message the visitor found helpful.
    pub message_id: Uuid,
}

/// Body of `POST /admin/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    /// Admin username.
    pub username: String,
    /// Admin password in plain text.
    pub password: String,
}
