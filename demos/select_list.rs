//! Select List - A three-item menu on a live terminal
//!
//! Arrow keys move, Enter (or a click) submits, Ctrl+C quits.
//! The screen is repainted from a plain-text snapshot after every redraw.
//!
//! Run with: cargo run --example select_list

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use crossterm::{cursor, queue, style, terminal};
use spark_widgets::{
    mount, pipeline, reset_document, tick, Document, Element, ElementEvent, EventType, FocusReason, Item,
    MenuProps, PagedMenu, Propagation,
};

fn paint(width: u16, height: u16) -> io::Result<()> {
    let mut out = io::stdout();
    queue!(out, terminal::Clear(terminal::ClearType::All))?;
    for (row, line) in pipeline::snapshot(width, height).iter().enumerate() {
        queue!(out, cursor::MoveTo(0, row as u16), style::Print(line))?;
    }
    out.flush()
}

fn main() -> spark_widgets::Result<()> {
    reset_document();

    let (width, height) = terminal::size()?;
    let document = Document::new(width, height);

    let menu = PagedMenu::column(
        document.node(),
        MenuProps {
            x: 2,
            y: 1,
            items: vec![
                Item::new("Todo", "todo"),
                Item::new("In Progress", "in-progress"),
                Item::new("Done", "done"),
            ],
            left_padding: " ".into(),
            right_padding: " ".into(),
            focus_left_padding: Some(">".into()),
            ..Default::default()
        },
        None,
    )?;

    let submitted = Rc::new(RefCell::new(None::<&'static str>));
    let probe = submitted.clone();
    menu.on(EventType::Submit, move |event| {
        if let ElementEvent::Submit(submit) = event {
            *probe.borrow_mut() = submit.value.get::<&'static str>().copied();
        }
        Propagation::Handled
    });

    let handle = mount(true)?;
    document.give_focus_to(&menu, FocusReason::Direct)?;

    let mut painted = None;
    loop {
        if !tick(&handle)? {
            break;
        }
        if submitted.borrow().is_some() {
            break;
        }
        let generation = pipeline::generation();
        if painted != Some(generation) {
            paint(width, height)?;
            painted = Some(generation);
        }
    }

    handle.unmount();
    menu.destroy();

    let mut out = io::stdout();
    queue!(out, terminal::Clear(terminal::ClearType::All), cursor::MoveTo(0, 0))?;
    out.flush()?;
    if let Some(value) = submitted.borrow().as_ref() {
        println!("Submitted: {value}");
    }
    Ok(())
}
