//! The tag catalog. Each entry gets a builder shortcut on [`Doc`]:
//! full tags get `name(args)` and `name_with(args, block)`, empty tags get
//! `name(attributes)`.

use crate::args::Args;
use crate::attributes::Attributes;
use crate::doc::Doc;
use crate::error::HtmlResult;

/// Tags that stay on the current line when pretty-printing
pub const INLINE_TAGS: &[&str] = &[
    "a", "b", "button", "i", "img", "input", "select", "small", "span", "textarea",
];

/// A catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TagDescriptor {
    pub name: &'static str,
    pub self_closing: bool,
}

macro_rules! tag_catalog {
    (
        full: [$($full:ident / $full_with:ident),* $(,)?],
        empty: [$($empty:ident),* $(,)?] $(,)?
    ) => {
        /// Tags rendered with an opening and a closing tag, even when empty
        pub const FULL_TAGS: &[&str] = &[$(stringify!($full)),*];

        /// Void tags, rendered self-closing as `<name />`
        pub const EMPTY_TAGS: &[&str] = &[$(stringify!($empty)),*];

        impl Doc<'_> {
            $(
                #[doc = concat!("Emit a `<", stringify!($full), ">` element.")]
                pub fn $full<'c>(&mut self, args: impl Into<Args<'c>>) -> HtmlResult<()> {
                    self.element(stringify!($full), args)
                }

                #[doc = concat!("Emit a `<", stringify!($full), ">` element whose body `block` writes.")]
                pub fn $full_with<'c, F>(&mut self, args: impl Into<Args<'c>>, block: F) -> HtmlResult<()>
                where
                    F: FnOnce(&mut Doc<'_>) -> HtmlResult<()>,
                {
                    self.element_with(stringify!($full), args, block)
                }
            )*

            $(
                #[doc = concat!("Emit an empty `<", stringify!($empty), " />` element.")]
                pub fn $empty(&mut self, attributes: impl Into<Attributes>) {
                    self.empty_element(stringify!($empty), attributes)
                }
            )*
        }
    };
}

tag_catalog! {
    full: [
        a / a_with, abbr / abbr_with, acronym / acronym_with, address / address_with,
        article / article_with, aside / aside_with, audio / audio_with,
        b / b_with, bdo / bdo_with, big / big_with, blockquote / blockquote_with,
        body / body_with, button / button_with,
        canvas / canvas_with, caption / caption_with, center / center_with, cite / cite_with,
        code / code_with, colgroup / colgroup_with, command / command_with,
        datalist / datalist_with, dd / dd_with, del / del_with, details / details_with,
        dfn / dfn_with, dialog / dialog_with, div / div_with, dl / dl_with, dt / dt_with,
        em / em_with,
        fieldset / fieldset_with, figure / figure_with, footer / footer_with, form / form_with,
        frameset / frameset_with,
        h1 / h1_with, h2 / h2_with, h3 / h3_with, h4 / h4_with, h5 / h5_with, h6 / h6_with,
        head / head_with, header / header_with, hgroup / hgroup_with, html / html_with,
        i / i_with, iframe / iframe_with, ins / ins_with, keygen / keygen_with, kbd / kbd_with,
        label / label_with, legend / legend_with, li / li_with,
        map / map_with, mark / mark_with, meter / meter_with,
        nav / nav_with, noframes / noframes_with, noscript / noscript_with,
        object / object_with, ol / ol_with, optgroup / optgroup_with, option / option_with,
        p / p_with, pre / pre_with, progress / progress_with,
        q / q_with, ruby / ruby_with, rt / rt_with, rp / rp_with, s / s_with,
        samp / samp_with, script / script_with, section / section_with, select / select_with,
        small / small_with, span / span_with, strike / strike_with, strong / strong_with,
        style / style_with, sub / sub_with, sup / sup_with,
        table / table_with, tbody / tbody_with, td / td_with, textarea / textarea_with,
        tfoot / tfoot_with, th / th_with, thead / thead_with, time / time_with,
        title / title_with, tr / tr_with, tt / tt_with,
        u / u_with, ul / ul_with,
        var / var_with, video / video_with,
    ],
    empty: [
        area, base, br, col, embed, frame, hr, img, input, link, meta, param, source,
    ],
}

/// Full tags followed by empty tags
pub fn all_tags() -> Vec<&'static str> {
    FULL_TAGS.iter().chain(EMPTY_TAGS).copied().collect()
}

/// Every catalog entry, full tags first
pub fn catalog() -> impl Iterator<Item = TagDescriptor> {
    let full = FULL_TAGS.iter().map(|&name| TagDescriptor {
        name,
        self_closing: false,
    });
    let empty = EMPTY_TAGS.iter().map(|&name| TagDescriptor {
        name,
        self_closing: true,
    });
    full.chain(empty)
}

pub fn lookup(name: &str) -> Option<TagDescriptor> {
    catalog().find(|tag| tag.name == name)
}

/// Whether pretty-printing puts this tag on its own line
pub fn is_newliney(name: &str) -> bool {
    !INLINE_TAGS.contains(&name)
}
