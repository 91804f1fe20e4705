use cinemateca_models::{Actor, Creator};
use serde_json::Value;

use crate::images::{ImageResolver, ImageSize};
use crate::resolver::{fields, member_id, resolve, resolve_array, resolve_string};

const DIRECTOR_JOB: &str = "Director";

fn photo_path(member: &Value) -> Option<&str> {
    resolve(member, &fields::PHOTO).and_then(Value::as_str)
}

fn to_creator(member: &Value, images: &ImageResolver) -> Creator {
    Creator {
        id: member_id(member, &fields::ID),
        name: resolve_string(member, &fields::PERSON_NAME),
        photo_url: images.to_absolute_url(photo_path(member), ImageSize::W185),
    }
}

/// Map every cast member of a credits response.
///
/// Members without a photo get `placeholder_url` so the UI never has to
/// branch on an empty URL.
pub fn extract_cast(credits: &Value, images: &ImageResolver, placeholder_url: &str) -> Vec<Actor> {
    resolve_array(credits, &fields::EMBEDDED_CAST)
        .iter()
        .map(|member| {
            let photo_url = images.to_absolute_url(photo_path(member), ImageSize::W185);
            Actor {
                id: member_id(member, &fields::ID),
                name: resolve_string(member, &fields::PERSON_NAME),
                photo_url: if photo_url.is_empty() {
                    placeholder_url.to_string()
                } else {
                    photo_url
                },
                character: resolve_string(member, &fields::CHARACTER),
            }
        })
        .collect()
}

/// First crew member whose job is exactly "Director". No other role is
/// ever used as a substitute.
pub fn extract_director(credits: &Value, images: &ImageResolver) -> Option<Creator> {
    resolve_array(credits, &fields::EMBEDDED_CREW)
        .iter()
        .find(|member| member.get("job").and_then(Value::as_str) == Some(DIRECTOR_JOB))
        .map(|member| to_creator(member, images))
}

/// Every `created_by` entry of a series detail record, in order
pub fn extract_creators(detail: &Value, images: &ImageResolver) -> Vec<Creator> {
    resolve_array(detail, &fields::CREATORS)
        .iter()
        .map(|member| to_creator(member, images))
        .collect()
}
