//! Component registry: content-type name to renderer.
//!
//! Two fixed tables exist. The **clean** table serves public pages and knows
//! only canonical component names; a block it cannot resolve renders as a
//! hidden placeholder so one stray block never takes a page down. The
//! **editor** table serves `/editor/...` previews, additionally accepts the
//! legacy aliases older content still uses, and treats an unresolvable block
//! as an error so editors see the problem immediately.
//!
//! The table is chosen once per request from the path, see
//! [`RegistryKind::for_path`].

use crate::content::{Block, ContentBlock};
use crate::sections::{self, BlockContext};
use maud::{Markup, html};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("no renderer for component `{component}` (block {uid})")]
    UnknownBlock { component: String, uid: String },
    #[error("renderer `{renderer}` cannot render a `{component}` block")]
    Mismatch {
        renderer: &'static str,
        component: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryKind {
    Clean,
    Editor,
}

impl RegistryKind {
    /// `/editor` and everything below it use the editor table.
    pub fn for_path(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        if path == "/editor" || path.starts_with("/editor/") {
            RegistryKind::Editor
        } else {
            RegistryKind::Clean
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RegistryKind::Clean => "clean",
            RegistryKind::Editor => "editor",
        }
    }

    pub fn registry(self) -> &'static Registry {
        match self {
            RegistryKind::Clean => &CLEAN,
            RegistryKind::Editor => &EDITOR,
        }
    }
}

/// Page-level values renderers may need.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub kind: RegistryKind,
    pub site_name: &'a str,
}

impl<'a> RenderContext<'a> {
    pub fn is_editor(&self) -> bool {
        self.kind == RegistryKind::Editor
    }

    fn block(&self, block: &'a ContentBlock) -> BlockContext<'a> {
        BlockContext::new(block, self.is_editor())
    }
}

pub type RenderFn = for<'a> fn(&'a ContentBlock, &RenderContext<'a>) -> Result<Markup, RenderError>;

pub struct Registry {
    kind: RegistryKind,
    entries: &'static [(&'static str, RenderFn)],
}

static CLEAN: Registry = Registry {
    kind: RegistryKind::Clean,
    entries: &[
        ("hero", render_hero),
        ("pricing", render_pricing),
        ("gallery", render_gallery),
        ("faq", render_faq),
        ("footer", render_footer),
        ("map", render_map),
        ("experience", render_experience),
        ("alternating_blocks", render_alternating),
        ("brand_proof", render_brand_proof),
        ("spaces", render_spaces),
    ],
};

static EDITOR: Registry = Registry {
    kind: RegistryKind::Editor,
    entries: &[
        ("hero", render_hero),
        ("pricing", render_pricing),
        ("gallery", render_gallery),
        ("faq", render_faq),
        ("footer", render_footer),
        ("map", render_map),
        ("experience", render_experience),
        ("alternating_blocks", render_alternating),
        ("brand_proof", render_brand_proof),
        ("spaces", render_spaces),
        ("hero_section", render_hero),
        ("pricing_table", render_pricing),
        ("image_gallery", render_gallery),
        ("faq_section", render_faq),
        ("site_footer", render_footer),
    ],
};

impl Registry {
    pub fn kind(&self) -> RegistryKind {
        self.kind
    }

    pub fn resolve(&self, name: &str) -> Option<RenderFn> {
        self.entries
            .iter()
            .find(|(entry, _)| *entry == name)
            .map(|(_, render)| *render)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(name, _)| *name)
    }

    /// Render one block. An unresolved component is a placeholder in the
    /// clean table and an error in the editor table.
    pub fn render_block(
        &self,
        block: &ContentBlock,
        ctx: &RenderContext<'_>,
    ) -> Result<Markup, RenderError> {
        match self.resolve(&block.component) {
            Some(render) => render(block, ctx),
            None if self.kind == RegistryKind::Clean => {
                tracing::warn!(
                    component = %block.component,
                    uid = %block.uid,
                    "no renderer for block, emitting placeholder"
                );
                Ok(missing_block(block))
            }
            None => Err(RenderError::UnknownBlock {
                component: block.component.clone(),
                uid: block.uid.clone(),
            }),
        }
    }

    /// Render a page body in order. The first error aborts the page.
    pub fn render_blocks(
        &self,
        blocks: &[ContentBlock],
        ctx: &RenderContext<'_>,
    ) -> Result<Markup, RenderError> {
        let rendered = blocks
            .iter()
            .map(|block| self.render_block(block, ctx))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(html! { @for markup in rendered { (markup) } })
    }
}

fn missing_block(block: &ContentBlock) -> Markup {
    html! {
        div hidden data-missing-block=(block.component) data-block-uid=(block.uid) {}
    }
}

// =============================================================================
// Adapters: match the decoded payload and call the section renderer
// =============================================================================

fn mismatch(renderer: &'static str, block: &ContentBlock) -> RenderError {
    RenderError::Mismatch {
        renderer,
        component: block.component.clone(),
    }
}

fn render_hero<'a>(block: &'a ContentBlock, ctx: &RenderContext<'a>) -> Result<Markup, RenderError> {
    match &block.block {
        Block::Hero(hero) => Ok(sections::hero::render(hero, &ctx.block(block))),
        _ => Err(mismatch("hero", block)),
    }
}

fn render_pricing<'a>(block: &'a ContentBlock, ctx: &RenderContext<'a>) -> Result<Markup, RenderError> {
    match &block.block {
        Block::Pricing(pricing) => Ok(sections::pricing::render(pricing, &ctx.block(block))),
        _ => Err(mismatch("pricing", block)),
    }
}

fn render_gallery<'a>(block: &'a ContentBlock, ctx: &RenderContext<'a>) -> Result<Markup, RenderError> {
    match &block.block {
        Block::Gallery(gallery) => Ok(sections::gallery::render(gallery, &ctx.block(block))),
        _ => Err(mismatch("gallery", block)),
    }
}

fn render_faq<'a>(block: &'a ContentBlock, ctx: &RenderContext<'a>) -> Result<Markup, RenderError> {
    match &block.block {
        Block::Faq(faq) => Ok(sections::faq::render(faq, &ctx.block(block))),
        _ => Err(mismatch("faq", block)),
    }
}

fn render_footer<'a>(block: &'a ContentBlock, ctx: &RenderContext<'a>) -> Result<Markup, RenderError> {
    match &block.block {
        Block::Footer(footer) => Ok(sections::footer::render(
            footer,
            &ctx.block(block),
            ctx.site_name,
        )),
        _ => Err(mismatch("footer", block)),
    }
}

fn render_map<'a>(block: &'a ContentBlock, ctx: &RenderContext<'a>) -> Result<Markup, RenderError> {
    match &block.block {
        Block::Map(map) => Ok(sections::map::render(map, &ctx.block(block))),
        _ => Err(mismatch("map", block)),
    }
}

fn render_experience<'a>(
    block: &'a ContentBlock,
    ctx: &RenderContext<'a>,
) -> Result<Markup, RenderError> {
    match &block.block {
        Block::Experience(experience) => {
            Ok(sections::experience::render(experience, &ctx.block(block)))
        }
        _ => Err(mismatch("experience", block)),
    }
}

fn render_alternating<'a>(
    block: &'a ContentBlock,
    ctx: &RenderContext<'a>,
) -> Result<Markup, RenderError> {
    match &block.block {
        Block::AlternatingBlocks(items) => {
            Ok(sections::alternating::render(items, &ctx.block(block)))
        }
        _ => Err(mismatch("alternating_blocks", block)),
    }
}

fn render_brand_proof<'a>(
    block: &'a ContentBlock,
    ctx: &RenderContext<'a>,
) -> Result<Markup, RenderError> {
    match &block.block {
        Block::BrandProof(proof) => Ok(sections::brand_proof::render(proof, &ctx.block(block))),
        _ => Err(mismatch("brand_proof", block)),
    }
}

fn render_spaces<'a>(block: &'a ContentBlock, ctx: &RenderContext<'a>) -> Result<Markup, RenderError> {
    match &block.block {
        Block::Spaces(spaces) => Ok(sections::spaces::render(spaces, &ctx.block(block))),
        _ => Err(mismatch("spaces", block)),
    }
}
