use arbor_core::{
    ComponentClass, Context, ContextValues, Key, VNode, Value, component, connect, context,
    html::{br, div, li, span, ul},
    stateless, text,
};

use crate::{MemoryDom, NodeId, Patch, PatchList, ReconcileError, Root};

fn mount(node: &VNode) -> (MemoryDom, Root) {
    let mut dom = MemoryDom::new();
    let (root, patches) = Root::mount(dom.container(), node, None).unwrap();
    dom.apply(&patches).unwrap();
    dom.clear_mutations();
    (dom, root)
}

fn update(dom: &mut MemoryDom, root: &mut Root, node: &VNode) -> PatchList {
    let patches = root.update(node).unwrap();
    dom.apply(&patches).unwrap();
    patches
}

fn creates(patches: &PatchList) -> usize {
    patches.count(Patch::is_create)
}

fn removes(patches: &PatchList) -> usize {
    patches.count(|p| matches!(p, Patch::Remove { .. }))
}

fn inserts(patches: &PatchList) -> usize {
    patches.count(|p| matches!(p, Patch::Insert { .. }))
}

fn list(keys: &[&str]) -> VNode {
    ul().children(keys.iter().map(|&k| li().with_key(k).text_content(k)))
}

fn first_element(dom: &MemoryDom) -> NodeId {
    dom.children(dom.container())[0]
}

#[test]
fn mount_builds_the_tree() {
    let node = div()
        .class_name("app")
        .props([("id", "main")])
        .style([("color", "red")])
        .children([span().text_content("a < b"), text("tail"), br()]);
    let (dom, root) = mount(&node);
    assert!(root.is_mounted());
    assert_eq!(
        dom.to_html(),
        r#"<div class="app" id="main" style="color:red"><span>a &lt; b</span>tail<br></div>"#
    );
}

#[test]
fn identical_update_performs_no_mutation() {
    let view = || div().class_name("a").children([span().text_content("x"), text("y")]);
    let (mut dom, mut root) = mount(&view());
    let patches = update(&mut dom, &mut root, &view());
    assert!(patches.is_empty());
    assert!(dom.mutations().is_empty());
}

#[test]
fn changed_text_is_a_single_mutation() {
    let (mut dom, mut root) = mount(&div().children([text("a"), text("b")]));
    let patches = update(&mut dom, &mut root, &div().children([text("a"), text("c")]));
    assert_eq!(patches.len(), 1);
    assert!(matches!(&patches.as_slice()[0], Patch::SetText { content, .. } if &**content == "c"));
    assert_eq!(dom.to_html(), "<div>ac</div>");
}

#[test]
fn attributes_are_diffed() {
    let (mut dom, mut root) = mount(&div().props([("id", "a"), ("title", "t")]));
    let patches = update(
        &mut dom,
        &mut root,
        &div().props([("id", Value::from("b")), ("hidden", Value::from(true))]),
    );
    assert_eq!(
        patches.count(|p| matches!(p, Patch::SetAttribute { .. })),
        2
    );
    assert_eq!(
        patches.count(|p| matches!(p, Patch::RemoveAttribute { name, .. } if &**name == "title")),
        1
    );
    assert_eq!(dom.to_html(), r#"<div id="b" hidden></div>"#);

    let patches = update(&mut dom, &mut root, &div().props([("id", Value::from("b")), ("hidden", Value::from(false))]));
    assert_eq!(patches.len(), 1);
    assert_eq!(dom.to_html(), r#"<div id="b"></div>"#);
}

#[test]
fn class_and_style_are_diffed() {
    let (mut dom, mut root) = mount(&div().class_name("a").style([("color", "red"), ("top", "0")]));
    let patches = update(
        &mut dom,
        &mut root,
        &div().class_name("b").style([("color", "blue")]),
    );
    assert_eq!(patches.count(|p| matches!(p, Patch::SetClassName { .. })), 1);
    assert_eq!(patches.count(|p| matches!(p, Patch::SetStyle { .. })), 1);
    assert_eq!(patches.count(|p| matches!(p, Patch::RemoveStyle { .. })), 1);
    assert_eq!(dom.to_html(), r#"<div class="b" style="color:blue"></div>"#);
}

#[test]
fn dynamic_props_override_and_are_patched() {
    let view = |value: &str| {
        div()
            .props([("id", "static")])
            .dynamic_props([("value", value)])
    };
    let (mut dom, mut root) = mount(&view("1"));
    assert_eq!(dom.to_html(), r#"<div id="static" value="1"></div>"#);

    let patches = update(&mut dom, &mut root, &view("2"));
    assert_eq!(patches.len(), 1);
    assert!(matches!(&patches.as_slice()[0], Patch::SetAttribute { name, .. } if &**name == "value"));

    update(&mut dom, &mut root, &div().props([("id", "static")]).dynamic_props([("id", "live")]));
    assert_eq!(dom.to_html(), r#"<div id="live"></div>"#);
}

#[test]
fn tag_change_replaces_the_node() {
    let (mut dom, mut root) = mount(&div().child(span().text_content("x")));
    let old = dom.children(first_element(&dom))[0];
    let patches = update(&mut dom, &mut root, &div().child(li().text_content("x")));
    assert_eq!(creates(&patches), 1);
    assert_eq!(removes(&patches), 1);
    assert_ne!(dom.children(first_element(&dom))[0], old);
    assert_eq!(dom.to_html(), "<div><li>x</li></div>");
}

#[test]
fn key_change_replaces_the_node() {
    let (mut dom, mut root) = mount(&div().child(span().with_key("a")));
    let patches = update(&mut dom, &mut root, &div().child(span().with_key("b")));
    assert_eq!(creates(&patches), 1);
    assert_eq!(removes(&patches), 1);
}

#[test]
fn keyed_rotation_is_one_move() {
    let (mut dom, mut root) = mount(&list(&["a", "b", "c"]));
    let ul_id = first_element(&dom);
    let before = dom.children(ul_id).to_vec();

    let patches = update(&mut dom, &mut root, &list(&["c", "a", "b"]));
    assert_eq!(creates(&patches), 0);
    assert_eq!(removes(&patches), 0);
    assert_eq!(inserts(&patches), 1);
    assert_eq!(dom.children(ul_id), [before[2], before[0], before[1]]);
    assert_eq!(dom.to_html(), "<ul><li>c</li><li>a</li><li>b</li></ul>");
}

#[test]
fn keyed_reversal_keeps_one_in_place() {
    let (mut dom, mut root) = mount(&list(&["1", "2", "3", "4", "5"]));
    let patches = update(&mut dom, &mut root, &list(&["5", "4", "3", "2", "1"]));
    assert_eq!(creates(&patches), 0);
    assert_eq!(inserts(&patches), 4);
    assert_eq!(
        dom.to_html(),
        "<ul><li>5</li><li>4</li><li>3</li><li>2</li><li>1</li></ul>"
    );
}

#[test]
fn keyed_insert_and_remove() {
    let (mut dom, mut root) = mount(&list(&["a", "b", "c"]));
    let patches = update(&mut dom, &mut root, &list(&["a", "d", "c"]));
    assert_eq!(removes(&patches), 1);
    assert_eq!(patches.count(|p| matches!(p, Patch::CreateElement { .. })), 1);
    assert_eq!(dom.to_html(), "<ul><li>a</li><li>d</li><li>c</li></ul>");

    let patches = update(&mut dom, &mut root, &list(&["x", "a", "c", "y"]));
    assert_eq!(removes(&patches), 1);
    assert_eq!(patches.count(|p| matches!(p, Patch::CreateElement { .. })), 2);
    assert_eq!(
        dom.to_html(),
        "<ul><li>x</li><li>a</li><li>c</li><li>y</li></ul>"
    );
}

#[test]
fn keyed_matching_patches_content_in_place() {
    let (mut dom, mut root) = mount(&ul().children([li().with_key(1).text_content("old")]));
    let patches = update(&mut dom, &mut root, &ul().children([li().with_key(1).text_content("new")]));
    assert_eq!(patches.len(), 1);
    assert!(matches!(&patches.as_slice()[0], Patch::SetTextContent { .. }));
}

#[test]
fn unkeyed_lists_grow_and_shrink_at_the_end() {
    let view = |n: usize| ul().children((0..n).map(|i| li().text_content(i)));
    let (mut dom, mut root) = mount(&view(1));

    let patches = update(&mut dom, &mut root, &view(3));
    assert_eq!(patches.count(|p| matches!(p, Patch::CreateElement { .. })), 2);
    assert_eq!(removes(&patches), 0);

    let patches = update(&mut dom, &mut root, &view(1));
    assert_eq!(removes(&patches), 2);
    assert_eq!(creates(&patches), 0);
    assert_eq!(dom.to_html(), "<ul><li>0</li></ul>");
}

#[test]
fn switching_between_keyed_and_unkeyed_remounts() {
    let (mut dom, mut root) = mount(&list(&["a", "b"]));
    let patches = update(&mut dom, &mut root, &ul().children([li(), li()]));
    assert_eq!(removes(&patches), 2);
    assert_eq!(patches.count(|p| matches!(p, Patch::CreateElement { .. })), 2);
}

#[test]
fn key_contract_violations_fail_and_keep_the_tree() {
    let (mut dom, mut root) = mount(&list(&["a", "b"]));

    let mixed = ul().children([li().with_key("a"), li()]);
    assert_eq!(root.update(&mixed), Err(ReconcileError::MixedKeys));

    let duplicate = ul().children([li().with_key("a"), li().with_key("a")]);
    assert_eq!(
        root.update(&duplicate),
        Err(ReconcileError::DuplicateKey { key: Key::from("a") })
    );

    let patches = update(&mut dom, &mut root, &list(&["a", "b"]));
    assert!(patches.is_empty());
}

#[test]
fn void_element_rejects_children() {
    let dom = MemoryDom::new();
    let err = Root::mount(dom.container(), &br().child(span()), None).unwrap_err();
    assert_eq!(err, ReconcileError::VoidElementChildren { tag: "br".into() });
}

#[test]
fn children_form_transitions() {
    let (mut dom, mut root) = mount(&div().children([span(), span()]));

    let patches = update(&mut dom, &mut root, &div().text_content("t"));
    assert_eq!(removes(&patches), 2);
    assert_eq!(dom.to_html(), "<div>t</div>");

    let patches = update(&mut dom, &mut root, &div().unsafe_html("<b>h</b>"));
    assert_eq!(patches.len(), 1);
    assert_eq!(dom.to_html(), "<div><b>h</b></div>");

    update(&mut dom, &mut root, &div());
    assert_eq!(dom.to_html(), "<div></div>");

    update(&mut dom, &mut root, &div().child(span()));
    assert_eq!(dom.to_html(), "<div><span></span></div>");

    let patches = update(&mut dom, &mut root, &div().children([span(), text("x")]));
    assert_eq!(creates(&patches), 1);
    assert_eq!(dom.to_html(), "<div><span></span>x</div>");
}

fn label(props: &String) -> VNode {
    span().text_content(props)
}

#[test]
fn function_components_rerender_in_place() {
    let (mut dom, mut root) = mount(&div().child(stateless(label, "a".to_string())));
    assert_eq!(dom.to_html(), "<div><span>a</span></div>");

    let patches = update(&mut dom, &mut root, &div().child(stateless(label, "b".to_string())));
    assert_eq!(patches.len(), 1);
    assert_eq!(dom.to_html(), "<div><span>b</span></div>");
}

struct Counter(u32);

impl ComponentClass for Counter {
    type Props = u32;

    fn new(props: &u32, _context: &Context) -> Self {
        Self(*props)
    }

    fn render(&self) -> VNode {
        text(self.0)
    }
}

#[test]
fn component_identity_change_replaces() {
    let (mut dom, mut root) = mount(&div().child(component::<Counter>(1)));
    let patches = update(&mut dom, &mut root, &div().child(component::<Counter>(2)));
    assert_eq!(patches.len(), 1);
    assert_eq!(dom.to_html(), "<div>2</div>");

    let patches = update(&mut dom, &mut root, &div().child(stateless(label, "2".to_string())));
    assert_eq!(creates(&patches), 1);
    assert_eq!(removes(&patches), 1);
    assert_eq!(dom.to_html(), "<div><span>2</span></div>");
}

fn themed(theme: &'static str) -> VNode {
    context(
        ContextValues::new().with("theme", theme),
        div().child(connect(|ctx: &Context| {
            text(ctx.get::<&'static str>("theme").copied().unwrap_or("none"))
        })),
    )
}

#[test]
fn connectors_follow_context_changes() {
    let (mut dom, mut root) = mount(&themed("dark"));
    assert_eq!(dom.to_html(), "<div>dark</div>");

    let patches = update(&mut dom, &mut root, &themed("light"));
    assert_eq!(patches.len(), 1);
    assert_eq!(dom.to_html(), "<div>light</div>");
}

#[test]
fn root_context_reaches_components() {
    struct Theme(String);
    impl ComponentClass for Theme {
        type Props = ();
        fn new(_props: &(), context: &Context) -> Self {
            Self(context.get::<String>("theme").cloned().unwrap_or_default())
        }
        fn render(&self) -> VNode {
            text(&self.0)
        }
    }

    let mut dom = MemoryDom::new();
    let ctx = Context::root().push(&ContextValues::new().with("theme", "solar".to_string()));
    let (_root, patches) = Root::mount(dom.container(), &component::<Theme>(()), Some(&ctx)).unwrap();
    dom.apply(&patches).unwrap();
    assert_eq!(dom.to_html(), "solar");
}

#[test]
fn empty_nodes_hold_their_position() {
    let (mut dom, mut root) = mount(&div().children([VNode::empty(), span()]));
    assert_eq!(dom.to_html(), "<div><span></span></div>");

    let patches = update(&mut dom, &mut root, &div().children([text("x"), span()]));
    assert_eq!(creates(&patches), 1);
    assert_eq!(removes(&patches), 1);
    assert_eq!(dom.to_html(), "<div>x<span></span></div>");
}

#[test]
fn unmount_removes_everything() {
    let (mut dom, mut root) = mount(&div().children([span().text_content("a"), list(&["k"])]));
    let patches = root.unmount();
    assert_eq!(patches.len(), 1);
    dom.apply(&patches).unwrap();
    assert!(!root.is_mounted());
    assert_eq!(dom.to_html(), "");
    assert!(dom.is_empty());
}
