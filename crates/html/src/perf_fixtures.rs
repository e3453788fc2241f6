pub const BLOCK_TEMPLATE: &str =
    "<div class=box><span id=label>hello &amp; welcome</span><img src=x><!--c--></div>\n";

/// Repeats [`BLOCK_TEMPLATE`] `blocks` times, with the comment stripped when
/// `with_comments` is false (comments do not compile into patches).
pub fn make_blocks(blocks: usize, with_comments: bool) -> String {
    let block = if with_comments {
        BLOCK_TEMPLATE.to_string()
    } else {
        BLOCK_TEMPLATE.replace("<!--c-->", "")
    };
    block.repeat(blocks)
}
