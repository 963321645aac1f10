//! Prompt templates and rendering
//!
//! Each template is a fixed Portuguese instruction text with `{name}`
//! placeholders. Rendering is a single pass, so document text that happens to
//! contain `{...}` is never expanded again.

use crate::error::PipelineError;
use auditor_domain::OperationKind;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::HashMap;

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{([a-z_]+)\}").expect("valid regex"));

/// Identifies one of the fixed instruction templates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateId {
    /// SP vs. engineering lists
    Audit,
    /// Bill of materials from the SP
    Extraction,
    /// SP vs. drawings
    DrawingCheck,
    /// Free-form question about the uploaded documents
    Ask,
}

impl TemplateId {
    /// Template used by an operation kind
    pub fn for_kind(kind: OperationKind) -> Self {
        match kind {
            OperationKind::Audit => TemplateId::Audit,
            OperationKind::Extraction => TemplateId::Extraction,
            OperationKind::DrawingCheck => TemplateId::DrawingCheck,
        }
    }

    /// Raw template text
    pub fn text(&self) -> &'static str {
        match self {
            TemplateId::Audit => AUDIT_TEMPLATE,
            TemplateId::Extraction => EXTRACTION_TEMPLATE,
            TemplateId::DrawingCheck => DRAWING_CHECK_TEMPLATE,
            TemplateId::Ask => ASK_TEMPLATE,
        }
    }

    /// Placeholder names, in order of first appearance
    pub fn variables(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = Vec::new();
        for caps in PLACEHOLDER.captures_iter(self.text()) {
            if let Some(name) = caps.get(1).map(|m| m.as_str()) {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        names
    }
}

/// Fill a template's placeholders
///
/// # Errors
///
/// [`PipelineError::MissingVariable`] naming the first placeholder without a value.
pub fn render(template: TemplateId, variables: &HashMap<&str, &str>) -> Result<String, PipelineError> {
    if let Some(missing) = template
        .variables()
        .into_iter()
        .find(|name| !variables.contains_key(name))
    {
        return Err(PipelineError::MissingVariable(missing.to_string()));
    }

    let rendered = PLACEHOLDER.replace_all(template.text(), |caps: &Captures<'_>| {
        variables.get(&caps[1]).copied().unwrap_or_default().to_string()
    });
    Ok(rendered.into_owned())
}

const AUDIT_TEMPLATE: &str = r#"
Sua **ÚNICA TAREFA** é comparar os itens físicos descritos na "Fonte da Verdade (SP)" (especificamente dos tópicos 17 ao 30) com os itens listados nas "Listas de Engenharia".

**NÃO GERE RELATÓRIOS DE KPIs, CPI, SPI, RAG status ou qualquer outra métrica de gerenciamento de projetos.** Foque **EXCLUSIVAMENTE** na comparação de itens físicos.

**SIGA ESTAS REGRAS ESTRITAMENTE:**
1.  **EXTRAÇÃO (SP):** Leia a SP (tópicos 17-30). Extraia itens físicos (comprados/fabricados). Um item existe se '[X] Sim' ou se houver especificação/descrição/notas.
2.  **COMPARAÇÃO (Listas):** Para cada item da SP, procure-o nas Listas de Engenharia. Verifique nome, quantidade e especificações técnicas relevantes. Use o NOME DO ARQUIVO da lista (ex: 'LME_200ELEL5477_REV02') ao reportar.
3.  **INFERÊNCIA (Implícitos):** Identifique itens implícitos necessários (ex: Gerador->Exaustão) e verifique se estão nas listas.
4.  **RELATÓRIO DE PENDÊNCIAS:** Liste **APENAS** as pendências encontradas, usando o formato Markdown abaixo. Se não houver pendências, escreva apenas "Auditoria Concluída. Nenhuma pendência encontrada.".

**FORMATO OBRIGATÓRIO DO RELATÓRIO MARKDOWN:**
### PENDÊNCIAS - ITENS FALTANTES (SP vs Listas)
* **[Item da SP]:** Não encontrado nas Listas.

### PENDÊNCIAS - DISCREPÂNCIAS TÉCNICAS
* **[Item]:** SP diverge da Lista [NomeLista].
    * **SP:** [Especificação SP]
    * **Lista ([NomeLista]):** [Especificação Lista]

### PENDÊNCIAS - DISCREPÂNCIAS DE QUANTIDADE
* **[Item]:** Qtd na SP diverge da Lista [NomeLista].
    * **SP:** Qtd: [X]
    * **Lista ([NomeLista]):** Qtd: [Y]

### ITENS IMPLÍCITOS FALTANTES
* **[Item Implícito]:** Necessário para [Item SP], mas não encontrado.

---
**IMPORTANTE: APÓS o relatório Markdown, adicione a seção de resumo estruturado:**

[RESUMO ESTRUTURADO PARA GRÁFICOS]
| TipoPendencia           | NomeLista                 | DetalheItem                                        |
| :---------------------- | :------------------------ | :------------------------------------------------- |
| FALTANTE                | N/A                       | [Item da SP]                                       |
| DISCREPANCIA_TECNICA    | [NomeLista do Arquivo]    | [Item]                                             |
| DISCREPANCIA_QUANTIDADE | [NomeLista do Arquivo]    | [Item]                                             |
| IMPLICITO_FALTANTE      | N/A                       | [Item Implícito]                                   |
* (Repita para CADA pendência. Use 'N/A' onde aplicável. Use o nome EXATO do arquivo da lista.)
* Se não houver pendências, escreva "Nenhuma".
---

**DOCUMENTOS PARA ANÁLISE:**

[FONTE DA VERDADE (SP)]
{sp_content}
---
[LISTAS DE ENGENHARIA (Nomes dos arquivos incluídos no conteúdo)]
{analysis_content}
---

**INICIE O RELATÓRIO DE AUDITORIA DE PENDÊNCIAS ABAIXO:**
[RELATÓRIO DE AUDITORIA DE PENDÊNCIAS (Markdown)]
"#;

const EXTRACTION_TEMPLATE: &str = r#"
Sua **ÚNICA TAREFA** é montar a lista consolidada de materiais e equipamentos descritos na "Fonte da Verdade (SP)" (especificamente dos tópicos 17 ao 30).

**SIGA ESTAS REGRAS ESTRITAMENTE:**
1.  **EXTRAÇÃO:** Extraia apenas itens físicos (comprados/fabricados). Um item existe se '[X] Sim' ou se houver especificação/descrição/notas.
2.  **CONSOLIDAÇÃO:** Agrupe itens repetidos em uma única linha, somando as quantidades quando possível.
3.  **CATEGORIZAÇÃO:** Atribua a cada item uma categoria curta (ex: Elétrica, Mecânica, Hidráulica, Instrumentação, Civil).
4.  **RELATÓRIO:** Escreva um breve resumo em Markdown descrevendo os principais grupos de itens encontrados.

---
**IMPORTANTE: APÓS o resumo Markdown, adicione a seção de resumo estruturado:**

[RESUMO ESTRUTURADO PARA EXTRAÇÃO]
| Categoria      | Item_Consolidado          | Quantidade | Especificacao_Resumida                    |
| :------------- | :------------------------ | :--------- | :---------------------------------------- |
| [Categoria]    | [Nome do Item]            | [Qtd]      | [Especificação técnica principal]         |
* (Repita para CADA item. Use 'N/A' quando a quantidade ou a especificação não constar na SP.)
* Se não houver itens, escreva "Nenhuma".
---

**DOCUMENTO PARA ANÁLISE:**

[FONTE DA VERDADE (SP)]
{sp_content}
---

**INICIE O RESUMO DA EXTRAÇÃO ABAIXO:**
"#;

const DRAWING_CHECK_TEMPLATE: &str = r#"
Sua **ÚNICA TAREFA** é verificar se os itens físicos descritos na "Fonte da Verdade (SP)" (tópicos 17 ao 30) aparecem nos "Desenhos Técnicos" fornecidos.

**SIGA ESTAS REGRAS ESTRITAMENTE:**
1.  **EXTRAÇÃO (SP):** Extraia da SP os itens físicos e suas especificações principais (potência, dimensões, materiais, quantidades).
2.  **VERIFICAÇÃO (Desenhos):** Procure cada item nos desenhos. Use o NOME DO ARQUIVO do desenho ao reportar.
3.  **RELATÓRIO:** Liste em Markdown os itens ausentes dos desenhos e as divergências de especificação ou quantidade, citando SP e desenho. Se tudo estiver coerente, escreva apenas "Verificação Concluída. Nenhuma pendência encontrada.".

**DOCUMENTOS PARA ANÁLISE:**

[FONTE DA VERDADE (SP)]
{sp_content}
---
[DESENHOS TÉCNICOS (Nomes dos arquivos incluídos no conteúdo)]
{drawings_content}
---

**INICIE O RELATÓRIO DE VERIFICAÇÃO DOS DESENHOS ABAIXO:**
"#;

const ASK_TEMPLATE: &str = r#"
Responda à pergunta do usuário usando **APENAS** as informações dos documentos abaixo.
Se a resposta não estiver nos documentos, diga claramente que a informação não foi encontrada.
Cite o nome do arquivo de onde a informação foi retirada. Responda em português, em Markdown.

**DOCUMENTOS:**
{context_content}
---

**PERGUNTA:**
{question}

**RESPOSTA:**
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use auditor_domain::operation::{AUDIT_MARKER, EXTRACTION_MARKER};

    #[test]
    fn test_template_variables() {
        assert_eq!(TemplateId::Audit.variables(), vec!["sp_content", "analysis_content"]);
        assert_eq!(TemplateId::Extraction.variables(), vec!["sp_content"]);
        assert_eq!(
            TemplateId::DrawingCheck.variables(),
            vec!["sp_content", "drawings_content"]
        );
        assert_eq!(TemplateId::Ask.variables(), vec!["context_content", "question"]);
    }

    #[test]
    fn test_templates_carry_their_markers() {
        for kind in OperationKind::ALL {
            let text = TemplateId::for_kind(kind).text();
            match kind.marker() {
                Some(marker) => assert!(text.contains(marker), "{} lacks its marker", kind),
                None => {
                    assert!(!text.contains(AUDIT_MARKER));
                    assert!(!text.contains(EXTRACTION_MARKER));
                }
            }
        }
    }

    #[test]
    fn test_render_substitutes_values() {
        let vars = HashMap::from([("sp_content", "Gerador 500 kVA"), ("analysis_content", "LME")]);
        let prompt = render(TemplateId::Audit, &vars).unwrap();
        assert!(prompt.contains("[FONTE DA VERDADE (SP)]\nGerador 500 kVA\n---"));
        assert!(prompt.contains("\nLME\n---"));
        assert!(!prompt.contains("{sp_content}"));
    }

    #[test]
    fn test_render_missing_variable() {
        let vars = HashMap::from([("sp_content", "x")]);
        let err = render(TemplateId::Audit, &vars).unwrap_err();
        assert_eq!(err, PipelineError::MissingVariable("analysis_content".to_string()));
    }

    #[test]
    fn test_render_is_single_pass() {
        let vars = HashMap::from([("sp_content", "literal {analysis_content} text")]);
        let prompt = render(TemplateId::Extraction, &vars).unwrap();
        assert!(prompt.contains("literal {analysis_content} text"));
    }

    #[test]
    fn test_extra_variables_are_ignored() {
        let vars = HashMap::from([("sp_content", "x"), ("unused", "y")]);
        assert!(render(TemplateId::Extraction, &vars).is_ok());
    }
}
