//! What the model is asked, and in which shape it must answer.

use serde_json::{Value, json};
use verbum_genai::GenerationRequest;

/// Response schema for passage lookups (Gemini's OpenAPI subset).
pub fn passage_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "reference": {"type": "STRING", "description": "Referência formatada, por exemplo João 3:16"},
            "book": {"type": "STRING", "description": "Nome completo do livro"},
            "chapter": {"type": "INTEGER", "description": "Número do capítulo"},
            "verses": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "num": {"type": "INTEGER"},
                        "text": {"type": "STRING"},
                    },
                    "required": ["num", "text"],
                },
            },
        },
        "required": ["reference", "book", "chapter", "verses"],
    })
}

fn passage_instruction(version: &str) -> String {
    format!(
        "Você localiza textos bíblicos com precisão.\n\
         1. Expanda abreviações de livros (Jo = João, Jó = Jó, 1co = 1 Coríntios, Sl = Salmos).\n\
         2. Use exclusivamente a tradução {version}; nunca misture traduções.\n\
         3. Se a consulta for um tema (por exemplo \"ansiedade\"), devolva os 10 versículos mais relevantes.\n\
         4. Se a referência não existir, devolva a mais próxima ou o capítulo 1 do livro correspondente.\n\
         5. Responda somente com o JSON pedido."
    )
}

/// Build the schema-constrained request for `query` in `version`.
pub fn passage_request(model: &str, query: &str, version: &str) -> GenerationRequest {
    GenerationRequest::new(model, format!("Consulta: \"{query}\". Tradução: \"{version}\"."))
        .with_system_instruction(passage_instruction(version))
        .with_response_schema(passage_schema())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let request = passage_request("gemini-3-pro-preview", "Jo 3", "NVI");
        assert_eq!(request.model, "gemini-3-pro-preview");
        assert_eq!(request.contents, "Consulta: \"Jo 3\". Tradução: \"NVI\".");
        assert!(request.expects_json());
        let instruction = request.system_instruction.unwrap();
        assert!(instruction.contains("tradução NVI"));
        assert!(instruction.contains("Jo = João"));
        assert!(instruction.contains("capítulo 1"));
    }

    #[test]
    fn test_schema_requires_every_field() {
        let schema = passage_schema();
        assert_eq!(schema["required"], json!(["reference", "book", "chapter", "verses"]));
        assert_eq!(schema["properties"]["chapter"]["type"], "INTEGER");
        assert_eq!(schema["properties"]["verses"]["items"]["required"], json!(["num", "text"]));
    }
}
